use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use invitation_core::{
    Config, Countdown, CountdownState, LocalScheduler, SystemClock, TargetInstant,
};

use crate::render::CountdownBlock;

/// Redraw rate; finer than the tick so a change shows up promptly.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args)]
pub struct CountdownArgs {
    /// Override the configured target (YYYY-MM-DDTHH:MM:SS, local time)
    #[arg(long)]
    target: Option<String>,
    /// Keep showing the placeholder after the target passes
    #[arg(long)]
    keep_running: bool,
}

pub fn run(args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let target = match &args.target {
        Some(t) => TargetInstant::parse(t)?,
        None => config.target()?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, live(config, target, args.keep_running))
}

async fn live(
    config: Config,
    target: TargetInstant,
    keep_running: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config.countdown_settings();
    let block = CountdownBlock::new(&settings.marker_class);
    let countdown = Countdown::start(
        target,
        block.page.clone(),
        Rc::new(SystemClock),
        Rc::new(LocalScheduler),
        settings,
    )
    .ok_or("countdown block has no fields")?;

    println!("{}", config.event.title);
    println!("until {}", target.as_datetime().format("%A, %-d %B %Y %H:%M"));

    tracing::debug!(until = %target.as_datetime(), keep_running, "live countdown started");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stdout = std::io::stdout();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let mut last = String::new();
    loop {
        tokio::select! {
            _ = redraw.tick() => {
                let line = block.line();
                if line != last {
                    write!(stdout, "\r{line}   ")?;
                    stdout.flush()?;
                    last = line;
                }
                if countdown.state() == CountdownState::Ended && !keep_running {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    writeln!(stdout)?;

    countdown.cancel();
    Ok(())
}
