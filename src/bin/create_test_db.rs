use std::{
    error::Error,
    path::Path,
    process::exit,
    str::FromStr,
    sync::{Arc, Mutex},
};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    Category, ExpensePayload, PasswordHash, SQLiteExpenseService, SQLiteExpenseStore, create_user,
    initialize_db,
};

/// A utility for creating a test database for the JSON API server of expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of expenses to create for the test user.
    #[arg(long, short, default_value_t = 60)]
    expense_count: usize,
}

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "correct horse battery staple";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {TEST_EMAIL} with password {TEST_PASSWORD:?}...");

    let password_hash = PasswordHash::from_raw_password(TEST_PASSWORD, PasswordHash::DEFAULT_COST)?;
    let user = create_user(
        "Test User",
        &EmailAddress::from_str(TEST_EMAIL)?,
        password_hash,
        &conn,
    )?;

    println!("Creating {} expenses...", args.expense_count);

    let service = SQLiteExpenseService::new(SQLiteExpenseStore::new(Arc::new(Mutex::new(conn))));
    let today = OffsetDateTime::now_utc().date();

    for i in 0..args.expense_count {
        let category = Category::ALL[i % Category::ALL.len()];
        let date = today - Duration::days((i * 3 % 90) as i64);
        let amount = 5.0 + ((i * 37) % 200) as f64 + 0.25 * (i % 4) as f64;

        service.create(
            user.id,
            &ExpensePayload {
                title: Some(format!("{category} #{}", i + 1).into()),
                amount: Some(amount.into()),
                category: Some(category.as_str().into()),
                description: None,
                date: Some(date.to_string().into()),
            },
        )?;
    }

    println!("Success!");

    Ok(())
}
