mod app;
mod data;
mod logging;
mod model;
mod table;
mod ui;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::bail;
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use data::{DataClient, DataSource, LoadError, DEFAULT_API_URL};
use model::ScoreRecord;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

type LoadOutcome = (DataSource, Result<Vec<ScoreRecord>, LoadError>);

#[derive(Parser, Debug)]
#[command(author, version, about = "Average cricket scores by country", long_about = None)]
struct Args {
    /// Start with server data selected
    #[arg(long)]
    remote: bool,

    /// Score endpoint used when server data is selected
    #[arg(long, default_value = DEFAULT_API_URL)]
    url: String,

    /// Country to look up, may be given twice
    #[arg(short, long = "country", value_name = "NAME")]
    countries: Vec<String>,

    /// Print the averages once and exit instead of opening the UI
    #[arg(long)]
    print: bool,

    /// Directory for the log file (defaults to the system temp dir)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.countries.len() > 2 {
        bail!("at most two --country values are supported, got {}", args.countries.len());
    }

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    logging::init_logging(&log_dir)?;

    let client = Arc::new(DataClient::new(args.url.clone()));
    let mut app = App::new(DataSource::from_remote_flag(args.remote), &args.countries);
    info!(source = app.source.label(), url = client.url(), "starting");

    if args.print {
        print_once(&client, &mut app).await;
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::channel::<LoadOutcome>(16);

    // Initial load
    app.begin_load();
    spawn_load(client.clone(), app.source, tx.clone());

    let res = run_app(&mut terminal, &mut app, &client, &tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "ui loop failed");
        println!("{:?}", err)
    }

    Ok(())
}

async fn print_once(client: &DataClient, app: &mut App) {
    let source = app.source;
    app.begin_load();
    let result = client.load(source).await;
    app.apply_load(source, result);
    for row in app.rows().into_iter().flatten() {
        println!("{}", ui::format_row(&row));
    }
}

/// Runs one load in the background. Loads are never cancelled; whichever
/// finishes last replaces the table.
fn spawn_load(client: Arc<DataClient>, source: DataSource, tx: mpsc::Sender<LoadOutcome>) {
    tokio::spawn(async move {
        let result = client.load(source).await;
        let _ = tx.send((source, result)).await;
    });
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &Arc<DataClient>,
    tx: &mpsc::Sender<LoadOutcome>,
    rx: &mut mpsc::Receiver<LoadOutcome>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(source) = app.on_key(key) {
                        app.begin_load();
                        spawn_load(client.clone(), source, tx.clone());
                    }
                }
            }
        }

        while let Ok((source, result)) = rx.try_recv() {
            app.apply_load(source, result);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
