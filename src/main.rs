use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use bookchat::commands::{help_text, Command};
use bookchat::config::AppConfig;
use bookchat::display::terminal::TerminalSurface;
use bookchat::services::transport::http::HttpTransport;
use bookchat::session::ChatSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let transport = HttpTransport::new(&config.backend_url)?;

    let mut session = ChatSession::new(config.greeting.clone());
    tracing::info!(session = %session.id(), "using chat backend at {}", transport.base_url());

    let mut surface = TerminalSurface::new(std::io::stdout());
    surface.notice("Type /help for commands.")?;
    session.flush(&mut surface);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        surface.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Send(text) => {
                session.set_draft(text);
                session.submit_draft(&transport, &mut surface).await?;
            }
            Command::Reset => session.reset_session(&transport, &mut surface).await?,
            Command::Status => surface.render_panel()?,
            Command::Help => surface.notice(help_text())?,
            Command::Quit => break,
            Command::Unknown(name) => {
                surface.notice(&format!("Unknown command '/{name}'.\n{}", help_text()))?
            }
        }
    }

    tracing::info!(session = %session.id(), "leaving chat");
    Ok(())
}
