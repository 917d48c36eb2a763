use std::env;
use std::path::Path;
use tadka_feed_core::prelude::*;

fn discover_feed_paths() -> Vec<std::path::PathBuf> {
    let standard_paths = ["~/.tadka/feeds", "~/.config/tadka/feeds"];

    let mut discovered_paths = Vec::new();

    for path_str in &standard_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            discovered_paths.push(path.to_path_buf());
        }
    }

    discovered_paths
}

fn main() -> Result<()> {
    let mut monitor = FeedMonitor::new();
    let args: Vec<String> = env::args().collect();

    if args.len() >= 2 {
        println!("Loading feed from: {}", args[1]);
        monitor.load_with_fallback(&args[1..])?;
    } else {
        println!("Auto-discovering feeds...");
        let paths = discover_feed_paths();

        if paths.is_empty() {
            eprintln!("No feeds found in standard locations:");
            eprintln!("  ~/.tadka/feeds");
            eprintln!("  ~/.config/tadka/feeds");
            eprintln!();
            eprintln!("Usage: {} [feed.json ...]", args[0]);
            std::process::exit(1);
        }

        monitor.load_with_fallback(&paths)?;
    }

    let now = SystemClock.now();
    let tz = monitor.classifier().timezone();

    println!();
    println!("=== Feed Overview ({}) ===", tz.name());
    println!("Items loaded: {}", monitor.item_count());
    println!("Undated items: {}", monitor.undated_count());
    if let Some(latest) = monitor.latest_published() {
        println!("Newest item: {}", latest.with_timezone(&tz).format("%Y-%m-%d %H:%M"));
    }

    println!();
    println!("=== Buckets ===");
    for count in monitor.bucket_counts(now) {
        println!("{:<14} {:>5}", count.bucket().label(), count.count());
    }

    println!();
    println!("=== Categories ===");
    let mut categories: Vec<_> = monitor.category_breakdown().into_iter().collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (category, count) in categories {
        println!("{:<20} {:>5}", category, count);
    }

    println!();
    println!("=== Today ===");
    let today = monitor.filtered(Bucket::Today, now);
    if today.is_empty() {
        println!("Nothing published today.");
    }
    for item in today.iter().take(10) {
        let stamp = item
            .published_at()
            .map(|ts| ts.with_timezone(&tz).format("%H:%M").to_string())
            .unwrap_or_default();
        println!("{} [{}] {}", stamp, item.category(), item.title());
    }

    Ok(())
}
