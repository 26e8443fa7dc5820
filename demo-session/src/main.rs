mod commands;
mod logging;

use clap::{Parser, Subcommand};
use coparent_session::{LOCAL_STORE_TYPE, LOCAL_STORE_URL, Role, build_local_store};
use std::process::ExitCode;

/// Drive the co-parenting app's session lifecycle from a terminal
#[derive(Parser, Debug)]
#[command(name = "demo-session", version, about)]
struct Cli {
    /// Local store type (memory | sqlite); defaults to LOCAL_STORE_TYPE
    #[arg(long)]
    store_type: Option<String>,

    /// Local store url; defaults to LOCAL_STORE_URL
    #[arg(long)]
    store_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a session as if the identity provider just confirmed sign-in
    SignIn {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "parent")]
        role: Role,
    },
    /// Resolve the landing route as on app start
    Launch,
    /// Re-validate the session as on a foreground transition
    Foreground,
    /// Switch the active role
    SwitchRole { role: Role },
    /// Clear the session and sign out
    SignOut,
    /// Print the persisted session without refreshing it
    Show,
    /// Run a scripted lifecycle with a simulated clock
    Simulate {
        /// Days to stay idle before the final foreground
        #[arg(long, default_value_t = 31)]
        idle_days: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init_tracing("demo_session");

    let cli = Cli::parse();

    let store_type = cli.store_type.unwrap_or_else(|| LOCAL_STORE_TYPE.to_string());
    let store_url = cli.store_url.unwrap_or_else(|| LOCAL_STORE_URL.to_string());
    let local = match build_local_store(&store_type, &store_url).await {
        Ok(local) => local,
        Err(e) => {
            tracing::error!("Failed to open local store: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let manager = commands::manager_for(local);

    let result = match cli.command {
        Command::SignIn {
            subject,
            email,
            role,
        } => commands::sign_in(&manager, subject, email, role).await,
        Command::Launch => {
            commands::launch(&manager).await;
            Ok(())
        }
        Command::Foreground => {
            commands::foreground(&manager).await;
            Ok(())
        }
        Command::SwitchRole { role } => commands::switch_role(&manager, role).await,
        Command::SignOut => commands::sign_out(&manager).await,
        Command::Show => {
            commands::show(&manager).await;
            Ok(())
        }
        Command::Simulate { idle_days } => match commands::idle_period(idle_days) {
            Some(idle) => commands::simulate(idle).await,
            None => {
                eprintln!("error: --idle-days {idle_days} is out of range");
                return ExitCode::FAILURE;
            }
        },
    };

    manager.settle_mirrors().await;
    exit_code(result)
}

fn exit_code(result: Result<(), coparent_session::SessionError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
