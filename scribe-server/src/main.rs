//! Scribe persistence service
//!
//! Maintenance entrypoint for the persistence core: opens the pool, runs
//! migrations, and optionally bootstraps an admin account or prints the
//! account inventory. The HTTP routing layer consumes the library facade
//! directly and is not part of this binary.

mod args;
mod constants;
mod db;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Args;
use constants::*;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Library code only emits tracing events; the subscriber installed
    // here is the one observability sink for the whole process.
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    // Determine database path (use provided path or platform default)
    let db_path = args.database.unwrap_or_else(|| {
        match db::default_database_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{}{}", ERR_GENERIC, e);
                std::process::exit(1);
            }
        }
    });

    // Initialize database connection pool and run migrations
    let pool = match db::init_db(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{}{}", ERR_DATABASE_INIT, e);
            std::process::exit(1);
        }
    };
    println!("{}{}", MSG_DATABASE, db_path.display());

    let database = db::Database::new(pool);

    if let Some(username) = args.create_admin {
        // clap enforces the pairing, but be defensive about it anyway
        let Some(password) = args.admin_password else {
            eprintln!("{}", ERR_ADMIN_PASSWORD_REQUIRED);
            std::process::exit(1);
        };

        match database.users.create_user(&username, &password, "admin").await {
            Ok(user_id) => println!("{}{} (id {})", MSG_ADMIN_CREATED, username, user_id),
            Err(e) => {
                eprintln!("{}{}", ERR_ADMIN_CREATE, e);
                std::process::exit(1);
            }
        }
    }

    if args.list_users {
        let users = match database.users.get_all_users_info().await {
            Ok(users) => users,
            Err(e) => {
                eprintln!("{}{}", ERR_LIST_USERS, e);
                std::process::exit(1);
            }
        };
        match serde_json::to_string_pretty(&users) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}{}", ERR_LIST_USERS, e);
                std::process::exit(1);
            }
        }
    } else {
        match database.users.count_users().await {
            Ok(count) => println!("{}{}", MSG_USER_COUNT, count),
            Err(e) => {
                eprintln!("{}{}", ERR_GENERIC, e);
                std::process::exit(1);
            }
        }
    }
}
