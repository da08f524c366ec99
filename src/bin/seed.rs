use chrono::{Duration, NaiveDateTime};
use clap::Parser;
use noticeboard::{
    auth::Argon2Verifier,
    config::Settings,
    domain::{NewNotice, NewPhoto},
    repository::{NoticeRepository, PhotoRepository, SqliteNoticeRepository, SqlitePhotoRepository},
    visibility::{
        timestamp::{format_publish_time, DATE_FORMAT},
        BoardClock,
    },
};
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Seed the noticeboard database with sample notices and photos", long_about = None)]
struct Args {
    /// Database to seed, overriding `database.url` from the configuration
    #[arg(long)]
    database_url: Option<String>,

    /// Print an Argon2 hash for this admin password and exit
    #[arg(long, value_name = "PASSWORD")]
    hash_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Some(password) = args.hash_password {
        let hash = Argon2Verifier::hash_password(&password)?;
        println!("{}", hash);
        println!("\nSet it with NOTICEBOARD__AUTH__ADMIN_PASSWORD_HASH='{}'", hash);
        return Ok(());
    }

    println!("🌱 Starting database seeding...");

    let settings = Settings::new().unwrap_or_else(|e| {
        println!("⚠️  Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });
    let database_url = args.database_url.unwrap_or_else(|| settings.database.url.clone());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let notice_repo = SqliteNoticeRepository::new(db_pool.clone());
    let photo_repo = SqlitePhotoRepository::new(db_pool.clone());

    // Seed notices
    println!("📌 Creating notices...");

    // Publish times are board-local wall-clock text, like the server's.
    let now = BoardClock::from_offset_minutes(settings.board.utc_offset_minutes).now();
    let notices = sample_notices(now);

    for notice in notices {
        notice_repo.create(notice).await?;
    }

    println!("  ✅ Created 4 notices (2 live, 1 scheduled, 1 expired)");

    // Seed gallery
    println!("🖼️  Creating photos...");

    let photos = [
        ("https://picsum.photos/seed/garden/800/600", "Courtyard garden in bloom"),
        ("https://picsum.photos/seed/party/800/600", "Summer party on the roof terrace"),
    ];

    for (url, caption) in photos {
        photo_repo.create(NewPhoto {
            url: url.to_string(),
            caption: caption.to_string(),
        }).await?;
    }

    println!("  ✅ Created {} photos", photos.len());

    println!("\n✨ Database seeding complete!");
    println!("\n📝 Admin login needs NOTICEBOARD__AUTH__ADMIN_PASSWORD_HASH; generate one with:");
    println!("  cargo run --bin seed -- --hash-password <password>");

    Ok(())
}

/// Two live notices, one scheduled and one expired, relative to `now`.
fn sample_notices(now: NaiveDateTime) -> Vec<NewNotice> {
    let at = |offset: Duration| format_publish_time(now + offset);
    let on = |offset: Duration| (now + offset).date().format(DATE_FORMAT).to_string();

    vec![
        NewNotice {
            title: "Water shut-off on Thursday".to_string(),
            content: "Mains water will be off between 09:00 and 13:00 for valve replacement.".to_string(),
            author: "Building Management".to_string(),
            publish_date_time: at(-Duration::days(2)),
            is_urgent: true,
            pdf_url: None,
            expiry_date: Some(on(Duration::days(5))),
        },
        NewNotice {
            title: "Annual general meeting".to_string(),
            content: "All residents are invited to the AGM in the community room. Agenda attached.".to_string(),
            author: "Residents' Committee".to_string(),
            publish_date_time: at(-Duration::days(10)),
            is_urgent: false,
            pdf_url: None,
            expiry_date: None,
        },
        NewNotice {
            title: "Bike storage clear-out".to_string(),
            content: "Untagged bikes will be removed at the end of the month.".to_string(),
            author: "Caretaker".to_string(),
            publish_date_time: at(Duration::days(3)),
            is_urgent: false,
            pdf_url: None,
            expiry_date: None,
        },
        NewNotice {
            title: "Lift inspection".to_string(),
            content: "Lift A was out of service for its annual inspection.".to_string(),
            author: "Building Management".to_string(),
            publish_date_time: at(-Duration::days(30)),
            is_urgent: false,
            pdf_url: None,
            expiry_date: Some(on(-Duration::days(20))),
        },
    ]
}
