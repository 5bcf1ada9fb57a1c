mod triggers;

pub use triggers::{TriggerConfig, TriggerKind, TriggerState};

use crate::geometry::Vec2;

/// A caption already on screen may be replaced during its first half second
const INTERRUPT_GRACE_SECS: f32 = 0.5;

/// Default caption lifetime when a trigger does not specify one
const DEFAULT_DURATION_SECS: f32 = 1.8;

/// Greeting shown shortly after the robot is placed
const GREETING_TEXT: &str = "and I am G-0451, your guide";
const GREETING_DELAY_MS: f64 = 1500.0;
const GREETING_DURATION_SECS: f32 = 3.2;

/// Shown while the robot is scrolled out of view vertically
const OFFSCREEN_TEXT: &str = "Wait for me!!!";

/// Collision yelps, cycled in order
const COLLISION_LINES: [&str; 4] = ["Ouch!!", "OOF!!!", "That stung!!", "Who put that there?!"];
const COLLISION_COOLDOWN_MS: f64 = 15_000.0;
const COLLISION_DURATION_SECS: f32 = 1.2;

/// A greeting waiting for its show time
#[derive(Debug, Clone)]
struct PendingGreeting {
    show_at_ms: f64,
}

/// The caption bubble and the trigger bookkeeping that feeds it.
///
/// Captions are re-evaluated every frame from wall-clock milliseconds passed
/// in by the host; nothing here schedules its own callbacks.
#[derive(Debug)]
pub struct Narrator {
    pub text: String,
    pub visible: bool,
    /// Seconds the current caption has been displayed
    pub timer: f32,
    pub duration: f32,
    /// World anchor for bubbles pinned to a point instead of the robot
    pub anchor: Option<Vec2>,

    /// While set and in the future, lower-priority captions may not interrupt
    contextual_lock_until_ms: f64,

    states: [TriggerState; TriggerKind::COUNT],
    collision_line_index: usize,
    last_collision_ms: Option<f64>,
    pending_greeting: Option<PendingGreeting>,
}

impl Narrator {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            visible: false,
            timer: 0.0,
            duration: DEFAULT_DURATION_SECS,
            anchor: None,
            contextual_lock_until_ms: 0.0,
            states: [TriggerState::default(); TriggerKind::COUNT],
            collision_line_index: 0,
            last_collision_ms: None,
            pending_greeting: None,
        }
    }

    /// Advance the caption lifetime; expiry also releases the contextual lock
    pub fn tick(&mut self, dt: f32) {
        if self.visible {
            self.timer += dt;
            if self.timer > self.duration {
                self.visible = false;
                self.contextual_lock_until_ms = 0.0;
            }
        }
    }

    fn locked(&self, now_ms: f64) -> bool {
        self.contextual_lock_until_ms > 0.0 && now_ms < self.contextual_lock_until_ms
    }

    /// Whether a new caption may take effect right now: nothing visible, or
    /// the visible one is still inside its grace period, and no lock is held
    pub fn may_interrupt(&self, now_ms: f64) -> bool {
        (!self.visible || self.timer < INTERRUPT_GRACE_SECS) && !self.locked(now_ms)
    }

    fn show(&mut self, text: &str, duration: f32) {
        self.text = text.to_string();
        self.visible = true;
        self.timer = 0.0;
        self.duration = duration;
        self.anchor = None;
    }

    /// Arm the delayed greeting (called at placement time)
    pub fn schedule_greeting(&mut self, now_ms: f64) {
        self.visible = false;
        self.timer = 0.0;
        self.pending_greeting = Some(PendingGreeting {
            show_at_ms: now_ms + GREETING_DELAY_MS,
        });
    }

    /// Fire the greeting once its delay has elapsed. Deliberately ignores
    /// the lock: nothing else can be active this early.
    pub fn mature_greeting(&mut self, now_ms: f64) {
        let due = matches!(&self.pending_greeting, Some(p) if now_ms >= p.show_at_ms);
        if due {
            self.pending_greeting = None;
            self.show(GREETING_TEXT, GREETING_DURATION_SECS);
        }
    }

    /// Collision event from the steering step. Cooldown-limited, cycles
    /// through the yelp list, holds no lock.
    pub fn on_collision(&mut self, now_ms: f64) {
        let cooling = matches!(self.last_collision_ms, Some(t) if now_ms - t <= COLLISION_COOLDOWN_MS);
        if cooling || !self.may_interrupt(now_ms) {
            return;
        }
        let line = COLLISION_LINES[self.collision_line_index];
        self.collision_line_index = (self.collision_line_index + 1) % COLLISION_LINES.len();
        self.last_collision_ms = Some(now_ms);
        self.show(line, COLLISION_DURATION_SECS);
    }

    /// The robot left the viewport vertically; pin a plea to the edge point
    pub fn on_offscreen(&mut self, anchor: Vec2, now_ms: f64) {
        if !self.may_interrupt(now_ms) {
            return;
        }
        if !(self.visible && self.text == OFFSCREEN_TEXT) {
            self.show(OFFSCREEN_TEXT, DEFAULT_DURATION_SECS);
        }
        self.anchor = Some(anchor);
    }

    /// Back in view: bubbles attach to the robot again
    pub fn on_back_in_view(&mut self) {
        self.anchor = None;
    }

    /// A proximity trigger matched; fire it if its own state allows
    pub fn on_region(&mut self, kind: TriggerKind, now_ms: f64) {
        let config = kind.config();
        let state = self.states[kind as usize];
        if state.fired_once && config.one_shot {
            return;
        }
        if matches!(state.last_fired_ms, Some(t) if now_ms - t <= config.cooldown_ms) {
            return;
        }
        if !self.may_interrupt(now_ms) {
            return;
        }
        self.states[kind as usize] = TriggerState {
            last_fired_ms: Some(now_ms),
            fired_once: true,
        };
        self.show(config.message, config.duration_secs);
        if config.locks {
            self.contextual_lock_until_ms = now_ms + config.duration_secs as f64 * 1000.0;
        }
    }

    /// Trigger state, read-only (used by tests and the debug status bar)
    pub fn trigger_state(&self, kind: TriggerKind) -> &TriggerState {
        &self.states[kind as usize]
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_expires_and_releases_lock() {
        let mut n = Narrator::new();
        n.on_region(TriggerKind::Skills, 1000.0);
        assert!(n.visible);
        assert!(!n.may_interrupt(2000.0)); // locked while showing

        // Play out the full display duration
        for _ in 0..50 {
            n.tick(0.1);
        }
        assert!(!n.visible);
        assert!(n.may_interrupt(999_999.0));
    }

    #[test]
    fn test_region_trigger_is_one_shot_forever() {
        let mut n = Narrator::new();
        n.on_region(TriggerKind::Skills, 1000.0);
        assert!(n.trigger_state(TriggerKind::Skills).fired_once);
        let first_text = n.text.clone();

        // Expire the caption, wait far past the cooldown, approach again
        for _ in 0..60 {
            n.tick(0.1);
        }
        n.on_region(TriggerKind::Skills, 10_000_000.0);
        assert!(!n.visible);
        assert_eq!(n.text, first_text); // nothing new was shown
    }

    #[test]
    fn test_collision_cooldown_and_cycling() {
        let mut n = Narrator::new();
        n.on_collision(20_000.0);
        assert!(n.visible);
        let first = n.text.clone();

        // Within cooldown: ignored even after the caption expires
        for _ in 0..20 {
            n.tick(0.1);
        }
        n.on_collision(25_000.0);
        assert!(!n.visible);

        // Past cooldown: next line in the cycle
        n.on_collision(40_000.0);
        assert!(n.visible);
        assert_ne!(n.text, first);
        assert_eq!(n.text, COLLISION_LINES[1]);
    }

    #[test]
    fn test_lock_suppresses_collision_caption() {
        let mut n = Narrator::new();
        n.on_region(TriggerKind::Contact, 1000.0);
        assert!(n.visible);
        let contact_text = n.text.clone();

        // Still inside the grace window, where only the lock can refuse:
        // the contact caption holds its lock, so the collision loses
        n.tick(0.1);
        n.on_collision(1200.0);
        assert_eq!(n.text, contact_text);
    }

    #[test]
    fn test_grace_period_allows_replacement() {
        let mut n = Narrator::new();
        n.on_collision(20_000.0);
        n.tick(0.1); // still inside the grace window, collision holds no lock
        n.on_region(TriggerKind::Projects, 20_200.0);
        assert_eq!(n.text, TriggerKind::Projects.config().message);
    }

    #[test]
    fn test_greeting_fires_after_delay() {
        let mut n = Narrator::new();
        n.schedule_greeting(1000.0);
        n.mature_greeting(2000.0);
        assert!(!n.visible);
        n.mature_greeting(2500.0);
        assert!(n.visible);
        assert_eq!(n.text, GREETING_TEXT);
        // Delivered exactly once
        n.tick(10.0);
        n.mature_greeting(9000.0);
        assert!(!n.visible);
    }

    #[test]
    fn test_offscreen_pins_anchor_and_back_in_view_clears_it() {
        let mut n = Narrator::new();
        n.on_offscreen(Vec2::new(300.0, 12.0), 1000.0);
        assert!(n.visible);
        assert_eq!(n.text, OFFSCREEN_TEXT);
        assert_eq!(n.anchor, Some(Vec2::new(300.0, 12.0)));

        // Re-firing while visible just tracks the anchor
        n.tick(0.1);
        n.on_offscreen(Vec2::new(320.0, 12.0), 1100.0);
        assert_eq!(n.anchor, Some(Vec2::new(320.0, 12.0)));
        assert!(n.timer > 0.0);

        n.on_back_in_view();
        assert_eq!(n.anchor, None);
    }
}
