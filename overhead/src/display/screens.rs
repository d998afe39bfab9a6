//! Screen rendering and proximity effects.
//!
//! Three screens rotate in a fixed order:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ [>] 0.5NM    │ ─► │ [o] SFO-PDX  │ ─► │ [*] ASA B739 │ ─┐
//! │ ▓▓▓▓▓▓░░░░░  │    │  gradient    │    │  rainbow     │  │
//! └──────────────┘    └──────────────┘    └──────────────┘  │
//!        ▲                                                   │
//!        └───────────────────────────────────────────────────┘
//! ```
//!
//! Distance screen color and progress fill come from the proximity tier.

use crate::identity::AircraftClass;

use super::payload::{CustomPayload, IconMotion};
use super::view::FlightView;

/// Number of screens in the rotation.
pub const SCREEN_COUNT: usize = 3;

/// Tier boundaries as fractions of the display radius.
const TIER_A_FRACTION: f64 = 0.43;
const TIER_B_FRACTION: f64 = 0.71;

const ICON_AIRLINER: &str = "airplane";
const ICON_LIGHT_AIRCRAFT: &str = "smallplane";
const ICON_ROUTE: &str = "globe";
const ICON_IDENTITY: &str = "radar";

/// Route screen text when neither end of the route is known.
pub const ROUTE_UNKNOWN: &str = "Route Unknown";

const ROUTE_GRADIENT: (&str, &str) = ("#00C8FF", "#C800FF");
const PRIVATE_ACCENT: &str = "#64FF64";
const PROGRESS_BACKGROUND: &str = "#202020";

/// One screen in the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Distance,
    Route,
    Identity,
}

impl Screen {
    /// All screens in rotation order.
    pub const ALL: [Screen; SCREEN_COUNT] = [Screen::Distance, Screen::Route, Screen::Identity];

    /// Screen at a rotation index (wraps).
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % SCREEN_COUNT]
    }

    pub fn index(self) -> usize {
        match self {
            Screen::Distance => 0,
            Screen::Route => 1,
            Screen::Identity => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Proximity band of a flight relative to the display radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityTier {
    /// Closer than 43% of the radius.
    A,
    /// Closer than 71% of the radius.
    B,
    /// Anywhere else.
    C,
}

impl ProximityTier {
    /// Classify distance `distance_nm` against radius `radius_nm`.
    pub fn from_distance(distance_nm: f64, radius_nm: f64) -> Self {
        if distance_nm < TIER_A_FRACTION * radius_nm {
            ProximityTier::A
        } else if distance_nm < TIER_B_FRACTION * radius_nm {
            ProximityTier::B
        } else {
            ProximityTier::C
        }
    }

    /// Fixed color for the tier.
    pub fn color(&self) -> &'static str {
        match self {
            ProximityTier::A => "#FF3B30",
            ProximityTier::B => "#FFB000",
            ProximityTier::C => "#64C8FF",
        }
    }
}

/// Progress bar fill: 100 at the center, 0 at the edge.
pub fn progress_percent(distance_nm: f64, radius_nm: f64) -> u8 {
    if radius_nm <= 0.0 {
        return 0;
    }
    let clamped = distance_nm.clamp(0.0, radius_nm);
    ((1.0 - clamped / radius_nm) * 100.0).round() as u8
}

/// Arrow for a compass heading, in 90 degree sectors centered on N/E/S/W.
pub fn direction_arrow(heading: f64) -> &'static str {
    let h = heading.rem_euclid(360.0);
    if (45.0..135.0).contains(&h) {
        "→"
    } else if (135.0..225.0).contains(&h) {
        "↓"
    } else if (225.0..315.0).contains(&h) {
        "←"
    } else {
        "↑"
    }
}

/// Render settings shared by every screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Seconds before the device drops a stale screen.
    pub lifetime_secs: u32,
}

/// Render one screen for a view.
pub fn render(screen: Screen, view: &FlightView, options: RenderOptions) -> CustomPayload {
    let payload = match screen {
        Screen::Distance => render_distance(view),
        Screen::Route => render_route(view),
        Screen::Identity => render_identity(view),
    };
    payload.lifetime(options.lifetime_secs)
}

fn render_distance(view: &FlightView) -> CustomPayload {
    let tier = ProximityTier::from_distance(view.distance_nm, view.radius_nm);
    let icon = if view.class.uses_airliner_icon() {
        ICON_AIRLINER
    } else {
        ICON_LIGHT_AIRCRAFT
    };

    CustomPayload::new(format!("{:.1}NM", view.distance_nm))
        .icon(icon)
        .color(tier.color())
        .progress(
            progress_percent(view.distance_nm, view.radius_nm),
            tier.color(),
            PROGRESS_BACKGROUND,
        )
        .no_scroll()
}

fn render_route(view: &FlightView) -> CustomPayload {
    CustomPayload::new(route_text(view))
        .icon(ICON_ROUTE)
        .gradient(ROUTE_GRADIENT.0, ROUTE_GRADIENT.1)
        .push_icon(IconMotion::Slide)
}

/// "SFO → PDX" with a heading, "SFO-PDX" without one.
fn route_text(view: &FlightView) -> String {
    if view.origin.is_none() && view.destination.is_none() {
        return ROUTE_UNKNOWN.to_string();
    }
    let from = view.origin.as_deref().unwrap_or("???");
    let to = view.destination.as_deref().unwrap_or("???");

    match view.heading {
        Some(heading) => format!("{} {} {}", from, direction_arrow(heading), to),
        None => format!("{}-{}", from, to),
    }
}

fn render_identity(view: &FlightView) -> CustomPayload {
    let payload = CustomPayload::new(view.identity_text())
        .icon(ICON_IDENTITY)
        .push_icon(IconMotion::Bounce);

    match view.class {
        AircraftClass::Commercial => payload.rainbow(),
        AircraftClass::Private | AircraftClass::Unknown => payload.color(PRIVATE_ACCENT),
    }
}
