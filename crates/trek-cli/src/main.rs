use std::process::exit;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use trek_domain::{accounts, library, DomainError, StoreError, UserRepository};
use trek_persistence::{connect_pool, migrations, ConnectionProvider, DbConfig, PersistenceError, PgMediaRepository, PgPool,
                       PgUserRepository, PoolProvider};

const USAGE: &str = "Uso: trek migrate [--revert]
       trek register --username <U> --password <P>
       trek rotate-password --username <U> --password <P>
       trek delete-user --username <U>
       trek list --username <U> [--query <TXT>]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate { revert: bool },
    Register { username: String, password: String },
    RotatePassword { username: String, password: String },
    DeleteUser { username: String },
    List { username: String, query: Option<String> },
}

#[derive(Default)]
struct Flags {
    username: Option<String>,
    password: Option<String>,
    query: Option<String>,
    revert: bool,
}

fn parse_flags(args: &[String]) -> Flags {
    let mut flags = Flags::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--username" => { i += 1; flags.username = args.get(i).cloned(); }
            "--password" => { i += 1; flags.password = args.get(i).cloned(); }
            "--query" => { i += 1; flags.query = args.get(i).cloned(); }
            "--revert" => flags.revert = true,
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_args(args: &[String]) -> Option<Command> {
    let (sub, rest) = args.split_first()?;
    let f = parse_flags(rest);
    match sub.as_str() {
        "migrate" => Some(Command::Migrate { revert: f.revert }),
        "register" => Some(Command::Register { username: f.username?, password: f.password? }),
        "rotate-password" => Some(Command::RotatePassword { username: f.username?, password: f.password? }),
        "delete-user" => Some(Command::DeleteUser { username: f.username? }),
        "list" => Some(Command::List { username: f.username?, query: f.query }),
        _ => None,
    }
}

fn exit_code(err: &DomainError) -> i32 {
    match err {
        DomainError::NotFound(_)
        | DomainError::InvalidCredentials
        | DomainError::ValidationError(_)
        | DomainError::UsernameTaken(_)
        | DomainError::DuplicateTitle(_) => 4,
        DomainError::Hashing(_) | DomainError::Store(_) => 5,
    }
}

fn user_id_for(users: &dyn UserRepository, username: &str) -> Result<i32, DomainError> {
    users.find_by_username(username)?
         .map(|u| u.user_id)
         .ok_or_else(|| DomainError::NotFound(format!("usuario {username}")))
}

fn run(cmd: Command, provider: PoolProvider) -> Result<(), DomainError> {
    let users = PgUserRepository::new(provider.clone());
    let media = PgMediaRepository::new(provider.clone());
    match cmd {
        Command::Migrate { revert } => migrate(&provider, revert)?,
        Command::Register { username, password } => {
            let user = accounts::register(&users, &username, &password)?;
            println!("creado: user_id={} username={}", user.user_id, user.username);
        }
        Command::RotatePassword { username, password } => {
            let user_id = user_id_for(&users, &username)?;
            accounts::rotate_password(&users, user_id, &password)?;
            println!("contraseña rotada: {username}");
        }
        Command::DeleteUser { username } => {
            let user_id = user_id_for(&users, &username)?;
            accounts::delete_account(&users, user_id)?;
            println!("eliminado: {username}");
        }
        Command::List { username, query } => {
            let user_id = user_id_for(&users, &username)?;
            let items = library::search(&media, user_id, query.as_deref())?;
            for item in items {
                match serde_json::to_string(&item) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("[trek list] no se pudo serializar media_id={}: {e}", item.media_id),
                }
            }
        }
    }
    Ok(())
}

fn migrate(provider: &PoolProvider, revert: bool) -> Result<(), DomainError> {
    let store_err = |e: PersistenceError| DomainError::Store(StoreError::from(e));
    let mut conn = provider.connection().map_err(store_err)?;
    if revert {
        let version = migrations::revert_last_migration(&mut conn).map_err(store_err)?;
        info!(%version, "migration reverted");
        println!("revertida: {version}");
    } else {
        migrations::run_pending_migrations(&mut conn).map_err(store_err)?;
        println!("migraciones al día");
    }
    Ok(())
}

/// `migrate` gestiona el esquema por sí mismo; el resto arranca con las
/// pendientes ya aplicadas.
fn auto_migrates(cmd: &Command) -> bool {
    !matches!(cmd, Command::Migrate { .. })
}

fn open_pool(cmd: &Command) -> Result<PgPool, PersistenceError> {
    if auto_migrates(cmd) {
        return trek_persistence::build_dev_pool_from_env();
    }
    let cfg = DbConfig::from_env()?;
    connect_pool(&cfg.connection_url()?, cfg.min_connections, cfg.max_connections)
}

fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(cmd) = parse_args(&args) else {
        eprintln!("{USAGE}");
        exit(2);
    };

    let pool = match open_pool(&cmd) {
        Ok(p) => p,
        Err(e) => { error!(error = %e, "pool error"); eprintln!("[trek] pool error: {e}"); exit(5); }
    };
    if let Err(e) = run(cmd, PoolProvider { pool }) {
        warn!(error = %e, "command failed");
        eprintln!("error: {e}");
        exit(exit_code(&e));
    }
}
