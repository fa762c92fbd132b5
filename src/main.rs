use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;

use clap::Parser;
use octotouch::cli::Cli;
use octotouch::{
    build_info, init_logging, ClientOptions, Config, OctoPrintClient, PrinterClient, Supervisor,
    SystemdNotifier, UiContext, BUILD_DATE, VERSION,
};
use octotouch_ui::IdleSender;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

/// Exit status for invalid arguments or configuration.
const USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_options()) {
        eprintln!("octotouch: cannot initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let config = match cli.build_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("octotouch: {e:#}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("octotouch: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        version = VERSION,
        build = BUILD_DATE,
        server = %config.base_url(),
        resolution = %config.resolution,
        "Starting OctoTouch"
    );

    let client = OctoPrintClient::new(ClientOptions::new(config.base_url(), &config.api_key))?;
    let printer: Rc<dyn PrinterClient> = Rc::new(client);
    let ctx = UiContext::new(Arc::new(config), printer, build_info());
    let supervisor: Rc<dyn Supervisor> = Rc::new(SystemdNotifier::from_env());

    let signals = SignalWatcher::install(ctx.dispatcher.sender())?;
    let result = front_end(&ctx, supervisor);
    signals.close();

    tracing::info!("OctoTouch stopped");
    result
}

#[cfg(feature = "gtk")]
fn front_end(ctx: &Rc<UiContext>, supervisor: Rc<dyn Supervisor>) -> anyhow::Result<()> {
    octotouch_ui::gtk_surface::run(ctx, supervisor)
}

#[cfg(not(feature = "gtk"))]
fn front_end(ctx: &Rc<UiContext>, supervisor: Rc<dyn Supervisor>) -> anyhow::Result<()> {
    use std::time::Duration;

    let shell = octotouch::Shell::new(ctx, Box::new(octotouch::HeadlessSurface::new()), supervisor);
    shell.start();
    shell.notify_ready();
    while shell.run_once(Duration::from_millis(250)) {}
    shell.shutdown();
    Ok(())
}

/// Turns SIGINT and SIGTERM into a quit request on the idle queue.
struct SignalWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalWatcher {
    fn install(sender: IdleSender) -> anyhow::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    tracing::info!(signal, "Received signal, shutting down");
                    if !sender.quit() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    fn close(mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
