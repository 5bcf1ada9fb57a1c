/// Named proximity triggers tied to layout regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Skills = 0,
    Projects = 1,
    AcademicProjects = 2,
    Contact = 3,
    HomeArrow = 4,
}

impl TriggerKind {
    pub const COUNT: usize = 5;

    /// Static configuration for this trigger
    pub fn config(&self) -> &'static TriggerConfig {
        match self {
            TriggerKind::Skills => &TriggerConfig {
                threshold: 160.0,
                cooldown_ms: 25_000.0,
                duration_secs: 4.5,
                message: "IMO the skills wall undersells him",
                one_shot: true,
                locks: true,
            },
            TriggerKind::Projects => &TriggerConfig {
                threshold: 180.0,
                cooldown_ms: 25_000.0,
                duration_secs: 5.0,
                message: "Press the icon next to a title to dig into a project",
                one_shot: true,
                locks: true,
            },
            TriggerKind::AcademicProjects => &TriggerConfig {
                threshold: 160.0,
                cooldown_ms: 30_000.0,
                duration_secs: 4.0,
                message: "Entering the project bay... brace yourself for cool stuff!",
                one_shot: true,
                locks: true,
            },
            TriggerKind::Contact => &TriggerConfig {
                threshold: 160.0,
                cooldown_ms: 30_000.0,
                duration_secs: 4.5,
                message: "Almost the exit... but wait, you can reach out here.",
                one_shot: true,
                locks: true,
            },
            TriggerKind::HomeArrow => &TriggerConfig {
                threshold: 120.0,
                cooldown_ms: 0.0,
                duration_secs: 3.5,
                message: "WELCOME to my home",
                one_shot: true,
                locks: true,
            },
        }
    }
}

/// Per-trigger firing rules
#[derive(Debug)]
pub struct TriggerConfig {
    /// Robot-to-region distance below which the trigger matches
    pub threshold: f32,
    pub cooldown_ms: f64,
    pub duration_secs: f32,
    pub message: &'static str,
    /// Fires at most once for the lifetime of the session
    pub one_shot: bool,
    /// Firing suppresses other captions for the display duration
    pub locks: bool,
}

/// Mutable firing state, one per trigger kind
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerState {
    /// Wall-clock time of the last firing; `None` until the first
    pub last_fired_ms: Option<f64>,
    pub fired_once: bool,
}
