use std::rc::Rc;

use clap::Args;
use invitation_core::countdown::parse_local;
use invitation_core::{Clock, Config, Countdown, ManualScheduler, SystemClock, TargetInstant};

use crate::render::CountdownBlock;

#[derive(Args)]
pub struct PreviewArgs {
    /// Instant to render at (YYYY-MM-DDTHH:MM:SS, local time); defaults to now
    #[arg(long)]
    now: Option<String>,
    /// Override the configured target (YYYY-MM-DDTHH:MM:SS, local time)
    #[arg(long)]
    target: Option<String>,
}

pub fn run(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let target = match &args.target {
        Some(t) => TargetInstant::parse(t)?,
        None => config.target()?,
    };
    let now_ms = match &args.now {
        Some(now) => TargetInstant::from_local(parse_local(now)?)?.timestamp_ms(),
        None => SystemClock.now_ms(),
    };

    let settings = config.countdown_settings();
    let block = CountdownBlock::new(&settings.marker_class);
    // Time never advances, so only the initial render happens.
    let sched = Rc::new(ManualScheduler::new(now_ms));
    let countdown = Countdown::start(target, block.page.clone(), sched.clone(), sched, settings)
        .ok_or("countdown block has no fields")?;

    println!("{}", serde_json::to_string_pretty(&countdown.snapshot())?);
    Ok(())
}
