//! # Roads Server
//!
//! Record-keeping service for Meru County road-construction projects.
//!
//! ## Overview
//!
//! The server exposes the road register over HTTP:
//!
//! - **Road Listings**: sorted and searchable via the in-memory query engine
//! - **Project Records**: contractors, milestones, and progress photos
//! - **Statistics**: append-only portfolio snapshots with a full history
//! - **Map Output**: the register as GeoJSON for the county dashboard
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for persistent storage
//! - `roads-core` for sorting, search, and statistics aggregation

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use chrono::{NaiveDate, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roads_core::{PostgresRepository, RoadsRepository, aggregate};
use roads_model::{
    Contractor, ContractorID, Milestone, MilestoneID, Notification,
    NotificationID, Photo, PhotoID, Road, RoadID, RoadStatus, User, UserID,
};
use roads_server::{
    AppState,
    db::validate_database_url,
    infra::config::{Config, ConfigLoad, ConfigLoader},
    routes,
    user_handlers::ADMIN_EMAIL,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "roads-server")]
#[command(
    about = "Record-keeping service for Meru County road-construction projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, env = "ROADS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply the database schema and exit
    Migrate,
    /// Apply the schema, insert sample records, and exit
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Command::Db(DbCommand::Migrate) => {
                run_db_migrate(&cli.serve).await?;
                return Ok(());
            }
            Command::Db(DbCommand::Seed) => {
                run_db_seed(&cli.serve).await?;
                return Ok(());
            }
        }
    }

    run_server(cli.serve).await
}

struct ConfigBootstrap {
    config: Arc<Config>,
    database_url: String,
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<ConfigBootstrap> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Quieter defaults. Override via RUST_LOG.
                    "info,tower_http=warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    if !warnings.is_empty() {
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => {
                    warn!(message = %warning.message, hint = %hint, "configuration warning")
                }
                None => {
                    warn!(message = %warning.message, "configuration warning")
                }
            }
        }
    }

    let Some(database_url) = config.database.url.clone() else {
        error!(
            "DATABASE_URL or [database].url must be provided for PostgreSQL connections"
        );
        return Err(anyhow::anyhow!(
            "No PostgreSQL connection configuration found"
        ));
    };
    validate_database_url(&database_url)?;

    Ok(ConfigBootstrap {
        config: Arc::new(config),
        database_url,
    })
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let ConfigBootstrap { database_url, .. } = load_runtime_config(args)?;
    let repo = PostgresRepository::new(&database_url)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    repo.initialize_schema()
        .await
        .context("database migration failed")?;
    info!("Database schema applied successfully");
    Ok(())
}

async fn run_db_seed(args: &ServeArgs) -> anyhow::Result<()> {
    let ConfigBootstrap { database_url, .. } = load_runtime_config(args)?;
    let repo = PostgresRepository::new(&database_url)
        .await
        .context("failed to connect to PostgreSQL for seeding")?;
    repo.initialize_schema()
        .await
        .context("database migration failed")?;
    seed_database(&repo).await.context("database seed failed")?;
    info!("Database initialized with sample data");
    Ok(())
}

/// Insert the demo register: contractors, milestones, three roads with
/// associations, photos, the admin user, notifications, and the first
/// statistics snapshot.
async fn seed_database(repo: &PostgresRepository) -> anyhow::Result<()> {
    let contractors = vec![
        Contractor {
            id: ContractorID::new(),
            name: "Meru Builders Ltd.".to_string(),
            contact_email: "info@merubuilders.co.ke".to_string(),
            contact_phone: None,
        },
        Contractor {
            id: ContractorID::new(),
            name: "Highway Constructors Co.".to_string(),
            contact_email: "contact@highwayconstructors.com".to_string(),
            contact_phone: None,
        },
        Contractor {
            id: ContractorID::new(),
            name: "Urban Roads Ltd.".to_string(),
            contact_email: "support@urbanroads.com".to_string(),
            contact_phone: None,
        },
    ];
    for contractor in &contractors {
        repo.store_contractor(contractor).await?;
    }

    let milestone_specs = [
        ("Planning", "Initial planning phase"),
        ("Land Prep", "Land acquisition and preparation"),
        ("Foundation", "Laying the road foundation"),
        ("Paving", "Asphalt paving work"),
        ("Finishing", "Final touches and inspections"),
    ];
    let milestone_ids: Vec<MilestoneID> = milestone_specs
        .iter()
        .map(|_| MilestoneID::new())
        .collect();
    // Milestones are shared across roads; store them standalone first.
    for (id, (name, description)) in
        milestone_ids.iter().zip(milestone_specs.iter())
    {
        let milestone = Milestone {
            id: *id,
            name: name.to_string(),
            description: Some(description.to_string()),
            status: Milestone::DEFAULT_STATUS.to_string(),
        };
        repo.store_milestone(&milestone).await?;
    }

    let roads = vec![
        Road {
            id: RoadID::new(),
            name: "Maua Highway".to_string(),
            length: 18.5,
            budget: 2_400_000_000,
            status: RoadStatus::Ongoing,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 30).unwrap(),
            progress: 65,
            description: "The Maua Highway project represents our commitment \
                          to connecting Meru County's agricultural heartland \
                          to national markets."
                .to_string(),
            map_path: vec![
                [37.60, 0.08],
                [37.65, 0.06],
                [37.70, 0.04],
                [37.75, 0.02],
            ],
            contractors: vec![contractors[0].id],
            milestones: milestone_ids.clone(),
        },
        Road {
            id: RoadID::new(),
            name: "Nkubu Bypass".to_string(),
            length: 7.2,
            budget: 850_000_000,
            status: RoadStatus::Ongoing,
            start_date: NaiveDate::from_ymd_opt(2023, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            progress: 45,
            description: "The Nkubu Bypass will alleviate traffic congestion \
                          in the central business district."
                .to_string(),
            map_path: vec![[37.58, 0.00], [37.62, -0.02], [37.65, -0.04]],
            contractors: vec![contractors[1].id],
            milestones: milestone_ids.clone(),
        },
        Road {
            id: RoadID::new(),
            name: "Makutano Junction".to_string(),
            length: 3.8,
            budget: 420_000_000,
            status: RoadStatus::Completed,
            start_date: NaiveDate::from_ymd_opt(2022, 11, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 8, 20).unwrap(),
            progress: 100,
            description: "Makutano Junction upgrade has significantly \
                          improved traffic flow and safety."
                .to_string(),
            map_path: vec![[37.67, 0.03], [37.68, 0.02], [37.69, 0.01]],
            contractors: vec![contractors[2].id],
            milestones: milestone_ids.clone(),
        },
    ];
    for road in &roads {
        repo.store_road(road).await?;
    }

    let photo_urls = [
        (0, "https://images.unsplash.com/photo-1506905925346-21bda4d32df4"),
        (0, "https://images.unsplash.com/photo-1509310202330-aec5af0c4cbc"),
        (1, "https://images.unsplash.com/photo-1584017912151-3e2c1d0f4d0a"),
    ];
    for (road_index, url) in photo_urls {
        repo.store_photo(&Photo {
            id: PhotoID::new(),
            url: url.to_string(),
            caption: None,
            date_taken: Utc::now(),
            road_id: roads[road_index].id,
        })
        .await?;
    }

    let admin = User {
        id: UserID::new(),
        name: "Admin User".to_string(),
        email: ADMIN_EMAIL.to_string(),
        role: "County Engineer".to_string(),
        avatar_url: None,
        last_login: None,
    };
    repo.store_user(&admin).await?;

    let messages = [
        "New project proposal submitted",
        "Budget approval needed for Maua Highway",
        "Monthly progress report ready for review",
    ];
    for message in messages {
        repo.store_notification(&Notification {
            id: NotificationID::new(),
            user_id: admin.id,
            message: message.to_string(),
            is_read: false,
            created_at: Utc::now(),
        })
        .await?;
    }

    let snapshot = aggregate(&repo.list_roads().await?);
    repo.insert_snapshot(&snapshot).await?;

    Ok(())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.cors.allows_any() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("ignoring invalid CORS origin `{origin}`");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ]))
        .allow_headers(AllowHeaders::any())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let ConfigBootstrap {
        config,
        database_url,
    } = load_runtime_config(&args)?;

    let repo = PostgresRepository::new(&database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    repo.initialize_schema()
        .await
        .context("database schema bootstrap failed")?;

    let state = AppState::new(Arc::new(repo), config.clone());

    let app = routes::create_api_router()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config))
        .with_state(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("roads-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutdown signal received");
}
