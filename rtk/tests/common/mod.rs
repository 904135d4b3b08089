//! Shared harness for pipeline integration tests.

use log::debug;
use rtk::config::TrackballConfig;
use rtk::event::MotionAxis;
use rtk::report::{FeatureReport, InputReport};
use rtk::trackball::Trackball;
use rtk_types::mouse_button::MouseButton;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Tick cadence used by the scripted tests, 125 Hz.
pub const TICK_MS: u64 = 8;

/// One scripted input, applied before the tick it is listed under.
#[derive(Debug, Clone, Copy)]
pub enum TestInput {
    Move { dx: f64, dy: f64 },
    Scroll { dx: f64, dy: f64 },
    Button { button: MouseButton, pressed: bool },
    /// No input this tick, let the pipeline idle.
    Idle,
}

/// Everything the pipeline emitted while running a script.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub features: Vec<FeatureReport>,
    pub reports: Vec<InputReport>,
    /// Tick indices at which each input report was emitted.
    pub report_ticks: Vec<usize>,
}

impl PipelineOutput {
    pub fn total_x(&self) -> i64 {
        self.reports.iter().map(|r| r.x as i64).sum()
    }

    pub fn total_y(&self) -> i64 {
        self.reports.iter().map(|r| r.y as i64).sum()
    }

    pub fn total_wheel(&self) -> i64 {
        self.reports.iter().map(|r| r.wheel as i64).sum()
    }

    pub fn button_sequence(&self) -> Vec<u8> {
        let mut seq = Vec::new();
        for report in &self.reports {
            if seq.last() != Some(&report.buttons) {
                seq.push(report.buttons);
            }
        }
        seq
    }
}

pub fn default_trackball() -> Trackball {
    let mut tb = Trackball::new(TrackballConfig::default()).unwrap();
    tb.begin();
    tb
}

/// Drive the trackball through a script, one tick per step at a fixed
/// cadence, collecting everything it emits.
pub fn run_script(trackball: &mut Trackball, script: &[TestInput]) -> PipelineOutput {
    let mut output = PipelineOutput::default();
    let mut now = 1000;
    for (tick_index, input) in script.iter().enumerate() {
        match *input {
            TestInput::Move { dx, dy } => trackball.push_motion(MotionAxis::Move, dx, dy, now),
            TestInput::Scroll { dx, dy } => trackball.push_motion(MotionAxis::Scroll, dx, dy, now),
            TestInput::Button { button, pressed } => trackball.set_button(button, pressed),
            TestInput::Idle => {}
        }
        now += TICK_MS;
        let out = trackball.tick(now);
        if let Some(feature) = out.feature {
            debug!("tick {}: feature {:?}", tick_index, feature);
            output.features.push(feature);
        }
        if let Some(report) = out.report {
            debug!("tick {}: report {:?}", tick_index, report);
            output.reports.push(report);
            output.report_ticks.push(tick_index);
        }
    }
    output
}

/// Repeat `input` for `n` ticks.
pub fn repeat(input: TestInput, n: usize) -> Vec<TestInput> {
    vec![input; n]
}
