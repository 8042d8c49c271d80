//! Database seeder for NSK development and testing.
//!
//! Seeds the admin user plus a handful of programs, events, and
//! testimonials for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;
use uuid::Uuid;

use nsk_core::auth::hash_password;
use nsk_db::entities::{admin_users, events, programs, testimonials};

/// Seed admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Default seed admin credentials; override the password via SEED_ADMIN_PASSWORD.
const ADMIN_EMAIL: &str = "sensei@nsk.dev";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = nsk_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding programs...");
    seed_programs(&db).await;

    println!("Seeding events...");
    seed_events(&db).await;

    println!("Seeding testimonials...");
    seed_testimonials(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

/// Seeds the admin user for the content panel.
async fn seed_admin_user(db: &DatabaseConnection) {
    if admin_users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".to_string());
    let password_hash = hash_password(&password).expect("Failed to hash admin password");

    let now = Utc::now();
    let user = admin_users::ActiveModel {
        id: Set(admin_user_id()),
        email: Set(ADMIN_EMAIL.to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Sensei Admin".to_string()),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: {ADMIN_EMAIL}");
    }
}

/// Seeds the training programs shown on the home page.
async fn seed_programs(db: &DatabaseConnection) {
    let existing = programs::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Programs already exist, skipping...");
        return;
    }

    let seed_data = [
        (
            "Kyumino - Beginner",
            "Foundations of stance, balance, and the first kata.",
            "49.00",
            vec!["2 classes / week", "Beginner belt track", "Free uniform"],
        ),
        (
            "Kirigama - Advanced",
            "Advanced kata, sparring drills, and tournament preparation.",
            "79.00",
            vec!["4 classes / week", "Sparring sessions", "Tournament coaching"],
        ),
        (
            "Ninjando - Master",
            "Master-level training under the head sensei.",
            "99.00",
            vec!["Unlimited classes", "1-on-1 mentoring", "Weapons training"],
        ),
    ];

    let now = Utc::now();
    for (name, description, price, features) in seed_data {
        let program = programs::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(Decimal::from_str(price).expect("valid seed price")),
            features: Set(serde_json::json!(features)),
            image_url: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = program.insert(db).await {
            eprintln!("Failed to insert program {name}: {e}");
        } else {
            println!("  Created program: {name}");
        }
    }
}

/// Seeds a couple of upcoming events.
async fn seed_events(db: &DatabaseConnection) {
    let existing = events::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Events already exist, skipping...");
        return;
    }

    let now = Utc::now();
    let seed_data = [
        (
            "Summer belt grading",
            "Grading for all belt levels at the main dojo.",
            "Bring your full uniform. Grading starts at 9:00 sharp.",
            NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(),
            vec!["grading"],
        ),
        (
            "Inter-dojo friendship tournament",
            "Kumite and kata brackets against neighboring dojos.",
            "Open to intermediate and advanced students.",
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            vec!["tournament", "kumite"],
        ),
    ];

    for (title, excerpt, content, date, tags) in seed_data {
        let event = events::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            excerpt: Set(excerpt.to_string()),
            content: Set(content.to_string()),
            date: Set(date),
            tags: Set(serde_json::json!(tags)),
            image_url: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = event.insert(db).await {
            eprintln!("Failed to insert event {title}: {e}");
        } else {
            println!("  Created event: {title}");
        }
    }
}

/// Seeds testimonials for the home page.
async fn seed_testimonials(db: &DatabaseConnection) {
    let existing = testimonials::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Testimonials already exist, skipping...");
        return;
    }

    let now = Utc::now();
    let seed_data = [
        (
            "Putu W.",
            "Training here changed my discipline completely. The sensei pushes you exactly as hard as you can handle.",
            "Brown Belt",
            5_i16,
        ),
        (
            "Made S.",
            "My kids love the beginner classes and I love what it has done for their focus.",
            "Parent",
            5_i16,
        ),
    ];

    for (name, content, belt_level, rating) in seed_data {
        let testimonial = testimonials::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            content: Set(content.to_string()),
            belt_level: Set(belt_level.to_string()),
            rating: Set(rating),
            image_url: Set(None),
            created_at: Set(now.into()),
        };

        if let Err(e) = testimonial.insert(db).await {
            eprintln!("Failed to insert testimonial from {name}: {e}");
        } else {
            println!("  Created testimonial: {name}");
        }
    }
}
