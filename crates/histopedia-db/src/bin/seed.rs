//! # Seed Data Generator
//!
//! Prepares a fresh Histopedia database: a librarian account plus a small
//! demo catalog covering every genre.
//!
//! ## Usage
//! ```bash
//! # Seed ./histopedia_dev.db with the default librarian
//! cargo run -p histopedia-db --bin seed
//!
//! # Specify database path and librarian credentials
//! cargo run -p histopedia-db --bin seed -- --db ./data/histopedia.db \
//!     --librarian-email head@library.org --librarian-password s3cret
//! ```
//!
//! Running it twice is harmless: an existing librarian email or a non-empty
//! catalog is left untouched.

use std::env;

use histopedia_core::factory::BookFields;
use histopedia_core::{BookFactory, BookStatus, Genre, UserFactory};
use histopedia_db::credentials::hash_password;
use histopedia_db::{Database, DbConfig};

/// Demo catalog: (genre, title, description, author, publisher, year, isbn).
const CATALOG: &[(Genre, &str, &str, &str, &str, i32, &str)] = &[
    (
        Genre::Biography,
        "Napoleon: A Life",
        "The definitive life of the Corsican who remade Europe",
        "Andrew Roberts",
        "Penguin Books",
        2014,
        "978-0670025329",
    ),
    (
        Genre::Biography,
        "Team of Rivals",
        "Lincoln and the cabinet of former opponents he assembled",
        "Doris Kearns Goodwin",
        "Simon & Schuster",
        2005,
        "978-0684824901",
    ),
    (
        Genre::Biography,
        "Catherine the Great",
        "Portrait of the German princess who ruled all of Russia",
        "Robert K. Massie",
        "Random House",
        2011,
        "978-0679456728",
    ),
    (
        Genre::MilitaryHistory,
        "The Guns of August",
        "The first month of the Great War and how it unfolded",
        "Barbara Tuchman",
        "Macmillan",
        1962,
        "978-0345476098",
    ),
    (
        Genre::MilitaryHistory,
        "Stalingrad",
        "The fateful siege on the Volga from both sides of the line",
        "Antony Beevor",
        "Viking Press",
        1998,
        "978-0140247855",
    ),
    (
        Genre::MilitaryHistory,
        "Battle Cry of Freedom",
        "The Civil War era told as one sweeping narrative history",
        "James McPherson",
        "Oxford University Press",
        1988,
        "978-0195038637",
    ),
    (
        Genre::Revolution,
        "Citizens: A Chronicle",
        "A chronicle of the French Revolution from its first days",
        "Simon Schama",
        "Alfred A. Knopf",
        1989,
        "978-0394559483",
    ),
    (
        Genre::Revolution,
        "Ten Days That Shook the World",
        "An eyewitness account of the October Revolution in Petrograd",
        "John Reed",
        "Boni & Liveright",
        1919,
        "978-0140182934",
    ),
    (
        Genre::Revolution,
        "The Age of Revolution",
        "Europe between the fall of the Bastille and the Springtime of Peoples",
        "Eric Hobsbawm",
        "Abacus Books",
        1962,
        "978-0679772538",
    ),
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./histopedia_dev.db");
    let mut librarian_email = String::from("librarian@histopedia.org");
    let mut librarian_password = String::from("librarian");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--librarian-email" | "-e" => {
                if i + 1 < args.len() {
                    librarian_email = args[i + 1].clone();
                    i += 1;
                }
            }
            "--librarian-password" | "-p" => {
                if i + 1 < args.len() {
                    librarian_password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Histopedia Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>                  Database file path (default: ./histopedia_dev.db)");
                println!("  -e, --librarian-email <EMAIL>    Librarian login (default: librarian@histopedia.org)");
                println!("  -p, --librarian-password <PASS>  Librarian password (default: librarian)");
                println!("  -h, --help                       Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Histopedia Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Librarian account
    if db.users().email_exists(&librarian_email).await? {
        println!("⚠ Librarian {} already exists, keeping it", librarian_email);
    } else {
        let id = db.users().next_id().await?;
        let librarian = UserFactory::Librarian.create(
            &id,
            "librarian",
            &librarian_email,
            hash_password(&librarian_password)?,
        );
        db.users().insert(&librarian).await?;
        println!("✓ Created librarian {} ({})", librarian_email, id);
    }

    // Demo catalog
    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping catalog to avoid duplicates.");
    } else {
        println!();
        println!("Adding books...");

        for (genre, title, description, author, publisher, year, isbn) in CATALOG {
            let id = db.books().next_id().await?;
            let book = BookFactory::for_genre(*genre).create(BookFields {
                id,
                title: title.to_string(),
                description: description.to_string(),
                author: author.to_string(),
                publisher: publisher.to_string(),
                publication_year: *year,
                isbn: isbn.to_string(),
                status: BookStatus::Available,
            });

            if let Err(e) = db.books().insert(&book).await {
                eprintln!("Failed to insert {}: {}", book.id, e);
                continue;
            }
            println!("  {} {} ({})", book.id, book.title, book.genre);
        }

        println!("✓ Added {} books", db.books().count().await?);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
