//! Shelfmark — a personal bookmark keeper with live change-feed sync.
//!
//! Entry point: runs an interactive console demo that drives the sync core
//! against the in-process backend, end to end.

use shelfmark::app::App;
use shelfmark::managers::sync_core::Lifecycle;
use shelfmark::types::errors::SyncError;
use shelfmark::types::principal::Principal;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shelfmark=info")),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Shelfmark v{} — Demo Mode                    ║", env!("CARGO_PKG_VERSION"));
    println!("║     Personal bookmarks with live change-feed sync          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let app = match App::open_in_memory() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("failed to open backend: {}", e);
            std::process::exit(1);
        }
    };

    demo_session_gate(&app).await;
    demo_bookmarks(&app).await;
    demo_validation(&app).await;
    demo_live_updates(&app).await;
    demo_teardown(&app).await;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo complete — gate, sync core, and live feed exercised.");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

async fn demo_session_gate(app: &App) {
    section("Session Gate");

    println!("  authenticated before sign-in: {}", app.gate.is_authenticated().await);
    match app.core.refresh().await {
        Err(SyncError::Unauthenticated) => {
            println!("  refresh without a session fails fast: Unauthenticated")
        }
        other => println!("  unexpected refresh outcome: {:?}", other),
    }

    app.auth
        .sign_in(Principal::with_email("u-demo", "demo@example.com"));
    println!("  signed in as u-demo <demo@example.com>");
    println!("  authenticated after sign-in: {}", app.gate.is_authenticated().await);

    match app.startup().await {
        Ok(principal) => println!(
            "  core initialized for {} ({:?})",
            principal.id,
            app.core.lifecycle()
        ),
        Err(e) => println!("  startup failed: {}", e),
    }
}

async fn demo_bookmarks(app: &App) {
    section("Bookmarks");

    for (title, url) in [
        ("Rust", "https://www.rust-lang.org"),
        ("Tokio", "https://tokio.rs"),
        ("Example", "https://example.com"),
    ] {
        match app.core.add_bookmark(title, url).await {
            Ok(()) => println!("  added: {} — {}", title, url),
            Err(e) => println!("  add failed: {}", e),
        }
    }

    let view = app.core.bookmarks();
    println!("  view ({} bookmarks, newest first):", view.len());
    for bookmark in &view {
        println!("    {} — {}", bookmark.title, bookmark.url);
    }

    if let Some(last) = view.last() {
        match app.core.delete_bookmark(&last.id).await {
            Ok(()) => println!("  deleted: {}", last.title),
            Err(e) => println!("  delete failed: {}", e),
        }
    }
    println!("  view now has {} bookmarks", app.core.bookmarks().len());
}

async fn demo_validation(app: &App) {
    section("Validation");

    for (title, url) in [("   ", "https://example.com"), ("Bad", "not-a-url")] {
        match app.core.add_bookmark(title, url).await {
            Err(e) => println!("  rejected ({:?}, {:?}): {}", title, url, e),
            Ok(()) => println!("  unexpectedly accepted ({:?}, {:?})", title, url),
        }
    }
    println!("  view unchanged: {} bookmarks", app.core.bookmarks().len());
}

async fn demo_live_updates(app: &App) {
    section("Live change feed");

    let mut view_rx = app.core.watch_view();
    let before = app.core.bookmarks().len();

    // A write that bypasses the core entirely, as another device would.
    use shelfmark::providers::store::BookmarkStore;
    use shelfmark::types::bookmark::NewBookmark;
    let inserted = app
        .store
        .insert(NewBookmark {
            user_id: "u-demo".to_string(),
            title: "From another device".to_string(),
            url: "https://news.ycombinator.com".to_string(),
        })
        .await;
    match inserted {
        Ok(bookmark) => println!("  external insert confirmed: {}", bookmark.title),
        Err(e) => println!("  external insert failed: {}", e),
    }

    // The feed event triggers a refresh; the watch channel carries the new view.
    let waited =
        tokio::time::timeout(std::time::Duration::from_secs(2), view_rx.changed()).await;
    match waited {
        Ok(Ok(())) => {
            let view = view_rx.borrow_and_update();
            println!("  view re-rendered: {} -> {} bookmarks", before, view.len());
        }
        _ => println!("  no view update observed"),
    }
}

async fn demo_teardown(app: &App) {
    section("Teardown");

    println!("  active feed subscriptions: {}", app.feed.active_subscriptions());
    app.shutdown().await;
    println!(
        "  after shutdown: lifecycle {:?}, {} subscriptions, authenticated: {}",
        app.core.lifecycle(),
        app.feed.active_subscriptions(),
        app.gate.is_authenticated().await
    );
    if app.core.lifecycle() != Lifecycle::TornDown {
        eprintln!("  core did not reach TornDown");
    }
}
