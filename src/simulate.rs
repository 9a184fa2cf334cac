//! Drive the switch debouncer from scripted pin levels on a real-time tick.

use anyhow::{Result, bail};
use clap::Args;
use embedded_hal::digital::{ErrorType, InputPin};
use gp5_lib::constants::POLL_INTERVAL_MS;
use gp5_lib::switch::GuitarSwitch;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

/// Samples appended after the longest script so the last level can settle
const SETTLE_SAMPLES: usize = 8;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Pin levels of contact 1, one per sample: `0` = LOW (pressed), `1` = HIGH.
    #[arg(long = "contact1")]
    contact1: String,
    /// Pin levels of contact 2, same format as contact 1.
    #[arg(long = "contact2")]
    contact2: String,
    /// Tick period of the polling loop in milliseconds.
    #[arg(short, long, default_value_t = POLL_INTERVAL_MS)]
    tick_ms: u32,
}

/// Input pin replaying a fixed list of levels, holding the last one
struct ScriptedPin {
    levels: VecDeque<bool>,
    last_high: bool,
}

impl ScriptedPin {
    fn parse(script: &str) -> Result<Self> {
        let mut levels = VecDeque::with_capacity(script.len());
        for c in script.chars().filter(|c| !c.is_whitespace() && *c != '_') {
            match c {
                '0' => levels.push_back(false),
                '1' => levels.push_back(true),
                other => bail!("Invalid pin level {:?}, expected 0 or 1", other),
            }
        }
        let Some(&first) = levels.front() else {
            bail!("Pin script is empty");
        };
        Ok(Self {
            levels,
            last_high: first,
        })
    }

    fn len(&self) -> usize {
        self.levels.len()
    }

    fn next_level(&mut self) -> bool {
        if let Some(level) = self.levels.pop_front() {
            self.last_high = level;
        }
        self.last_high
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.next_level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.next_level())
    }
}

pub async fn run(args: SimulateArgs) -> Result<()> {
    if args.tick_ms == 0 {
        bail!("Tick period must be at least 1 ms");
    }
    let pin1 = ScriptedPin::parse(&args.contact1)?;
    let pin2 = ScriptedPin::parse(&args.contact2)?;

    // one sample per elapsed poll interval, the first level also seeds the switch
    let samples = pin1.len().max(pin2.len()) + SETTLE_SAMPLES;
    let ticks_per_sample = POLL_INTERVAL_MS.div_ceil(args.tick_ms) as usize;
    let ticks = samples * ticks_per_sample;

    let mut switch = GuitarSwitch::begin(pin1, pin2, 0);
    info!(position = %switch.position(), samples, "Simulation started");
    println!("{:>6} ms  {}", 0, switch.position());

    let mut ticker = interval(Duration::from_millis(args.tick_ms as u64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut now_ms: u32 = 0;
    for _ in 0..ticks {
        ticker.tick().await;
        now_ms = now_ms.wrapping_add(args.tick_ms);

        if let Some(position) = switch.poll(now_ms) {
            println!("{:>6} ms  {}", now_ms, position);
        }
        let (contact1, contact2) = switch.contacts();
        debug!(
            now_ms,
            history1 = %format!("{:08b}", contact1.history()),
            history2 = %format!("{:08b}", contact2.history()),
            "Tick"
        );
    }

    info!(position = %switch.position(), "Simulation finished");
    Ok(())
}
