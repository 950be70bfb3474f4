//! Multi-track goal conditions
//!
//! Goal-based challenges are a list of named pass/fail rules over per-track
//! controls (EQ, pan, reverb, volume, compression) or the shared bus.
//!
//! ## Missing data
//!
//! A condition that references a track id not present in the track map, or a
//! control the track leaves unset, evaluates to `false`. Incomplete setups
//! therefore score low instead of failing. [`Condition::check`] exposes the
//! distinction (`None` = data missing) for callers that need it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::{Band, BusParams, TrackMap, TrackParams};
use crate::similarity::ratio_score;

/// Pan at or beyond which a track counts as left/right
pub const PAN_SIDE_THRESHOLD: f64 = 0.3;
/// Pan magnitude within which a track counts as centered
pub const PAN_CENTER_WIDTH: f64 = 0.2;
/// Pan magnitude a track must exceed to count for `pan_opposite`
pub const PAN_OPPOSITE_THRESHOLD: f64 = 0.2;

/// Maximum reverb mix for front placement
pub const DEPTH_FRONT_MAX: f64 = 20.0;
/// Reverb mix bounds for middle placement
pub const DEPTH_MIDDLE_RANGE: (f64, f64) = (20.0, 50.0);
/// Minimum reverb mix for back placement (overlaps middle)
pub const DEPTH_BACK_MIN: f64 = 40.0;

/// Stereo position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanPosition {
    /// Left side
    Left,
    /// Right side
    Right,
    /// Center
    Center,
}

impl PanPosition {
    fn matches(&self, pan: f64) -> bool {
        match self {
            PanPosition::Left => pan <= -PAN_SIDE_THRESHOLD,
            PanPosition::Right => pan >= PAN_SIDE_THRESHOLD,
            PanPosition::Center => (-PAN_CENTER_WIDTH..=PAN_CENTER_WIDTH).contains(&pan),
        }
    }
}

impl fmt::Display for PanPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PanPosition::Left => "left",
            PanPosition::Right => "right",
            PanPosition::Center => "center",
        })
    }
}

/// Front-to-back placement via reverb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    /// Dry, up front
    Front,
    /// Some space
    Middle,
    /// Far back
    Back,
}

impl Depth {
    fn matches(&self, mix: f64) -> bool {
        match self {
            Depth::Front => mix <= DEPTH_FRONT_MAX,
            Depth::Middle => (DEPTH_MIDDLE_RANGE.0..=DEPTH_MIDDLE_RANGE.1).contains(&mix),
            Depth::Back => mix >= DEPTH_BACK_MIN,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Depth::Front => "front",
            Depth::Middle => "middle",
            Depth::Back => "back",
        })
    }
}

/// One goal rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Condition {
    /// At least one of the two tracks is flat or cut in `band`
    FrequencySeparation {
        /// First track
        track1: String,
        /// Second track
        track2: String,
        /// Band both compete in
        band: Band,
    },
    /// `louder` has more gain than `quieter` in `band`
    RelativeLevel {
        /// Track that should be louder
        louder: String,
        /// Track that should be quieter
        quieter: String,
        /// Band compared
        band: Band,
    },
    /// `band` on `track` cut by at least `min_cut` dB
    EqCut {
        /// Track id
        track: String,
        /// Band
        band: Band,
        /// Minimum cut (positive dB)
        min_cut: f64,
    },
    /// `band` on `track` boosted by at least `min_boost` dB
    EqBoost {
        /// Track id
        track: String,
        /// Band
        band: Band,
        /// Minimum boost (dB)
        min_boost: f64,
    },
    /// Descriptive placeholder, always satisfied
    Balance {
        /// Text shown to the learner
        description: String,
    },
    /// Track panned to a side or the center
    PanPosition {
        /// Track id
        track: String,
        /// Required position
        position: PanPosition,
    },
    /// Two tracks panned at least `min_spread` apart
    PanSpread {
        /// First track
        track1: String,
        /// Second track
        track2: String,
        /// Minimum pan distance
        min_spread: f64,
    },
    /// Two tracks panned to opposite sides
    PanOpposite {
        /// First track
        track1: String,
        /// Second track
        track2: String,
    },
    /// Reverb mix within bounds
    ReverbAmount {
        /// Track id
        track: String,
        /// Minimum mix (percent)
        min_mix: f64,
        /// Optional maximum mix (percent)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_mix: Option<f64>,
    },
    /// `wet_track` has at least `min_difference` more reverb than `dry_track`
    ReverbContrast {
        /// Drier track
        dry_track: String,
        /// Wetter track
        wet_track: String,
        /// Minimum mix difference (percent)
        min_difference: f64,
    },
    /// Track placed front/middle/back by reverb mix
    DepthPlacement {
        /// Track id
        track: String,
        /// Required depth
        depth: Depth,
    },
    /// `track1` strictly louder than `track2`
    VolumeLouder {
        /// Louder track
        track1: String,
        /// Quieter track
        track2: String,
    },
    /// Track volume within `[min_db, max_db]`
    VolumeRange {
        /// Track id
        track: String,
        /// Lower bound (dB)
        min_db: f64,
        /// Upper bound (dB)
        max_db: f64,
    },
    /// Two tracks within `tolerance` dB of each other
    VolumeBalanced {
        /// First track
        track1: String,
        /// Second track
        track2: String,
        /// Maximum difference (dB)
        tolerance: f64,
    },
    /// Track compressor amount within bounds
    TrackCompression {
        /// Track id
        track: String,
        /// Minimum amount (percent)
        min_amount: f64,
        /// Optional maximum amount (percent)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_amount: Option<f64>,
    },
    /// One track compressed at least `min_difference` more than another
    CompressionContrast {
        /// More compressed track
        more_compressed: String,
        /// Less compressed track
        less_compressed: String,
        /// Minimum amount difference (percent)
        min_difference: f64,
    },
    /// Bus compressor amount within bounds
    BusCompression {
        /// Minimum amount (percent)
        min_amount: f64,
        /// Optional maximum amount (percent)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_amount: Option<f64>,
    },
    /// Bus EQ `band` boosted by at least `min_boost` dB
    BusEqBoost {
        /// Band
        band: Band,
        /// Minimum boost (dB)
        min_boost: f64,
    },
    /// Bus EQ `band` cut by at least `min_cut` dB
    BusEqCut {
        /// Band
        band: Band,
        /// Minimum cut (positive dB)
        min_cut: f64,
    },
}

/// Optional-control lookups over a track map
struct TrackView<'a>(&'a TrackMap);

impl<'a> TrackView<'a> {
    fn track(&self, id: &str) -> Option<&'a TrackParams> {
        self.0.get(id)
    }

    fn pan(&self, id: &str) -> Option<f64> {
        self.track(id)?.pan
    }

    fn reverb(&self, id: &str) -> Option<f64> {
        self.track(id)?.reverb_mix
    }

    fn volume(&self, id: &str) -> Option<f64> {
        self.track(id)?.volume
    }

    fn compression(&self, id: &str) -> Option<f64> {
        self.track(id)?.compressor_amount
    }
}

fn within(value: f64, min: f64, max: Option<f64>) -> bool {
    value >= min && max.is_none_or(|max| value <= max)
}

impl Condition {
    /// Frequency separation between two tracks
    pub fn frequency_separation(track1: &str, track2: &str, band: Band) -> Self {
        Condition::FrequencySeparation {
            track1: track1.to_string(),
            track2: track2.to_string(),
            band,
        }
    }

    /// Track panned to `position`
    pub fn pan_position(track: &str, position: PanPosition) -> Self {
        Condition::PanPosition {
            track: track.to_string(),
            position,
        }
    }

    /// Track placed at `depth`
    pub fn depth_placement(track: &str, depth: Depth) -> Self {
        Condition::DepthPlacement {
            track: track.to_string(),
            depth,
        }
    }

    /// `track1` louder than `track2`
    pub fn volume_louder(track1: &str, track2: &str) -> Self {
        Condition::VolumeLouder {
            track1: track1.to_string(),
            track2: track2.to_string(),
        }
    }

    /// Kind name as it appears in challenge JSON
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::FrequencySeparation { .. } => "frequency_separation",
            Condition::RelativeLevel { .. } => "relative_level",
            Condition::EqCut { .. } => "eq_cut",
            Condition::EqBoost { .. } => "eq_boost",
            Condition::Balance { .. } => "balance",
            Condition::PanPosition { .. } => "pan_position",
            Condition::PanSpread { .. } => "pan_spread",
            Condition::PanOpposite { .. } => "pan_opposite",
            Condition::ReverbAmount { .. } => "reverb_amount",
            Condition::ReverbContrast { .. } => "reverb_contrast",
            Condition::DepthPlacement { .. } => "depth_placement",
            Condition::VolumeLouder { .. } => "volume_louder",
            Condition::VolumeRange { .. } => "volume_range",
            Condition::VolumeBalanced { .. } => "volume_balanced",
            Condition::TrackCompression { .. } => "track_compression",
            Condition::CompressionContrast { .. } => "compression_contrast",
            Condition::BusCompression { .. } => "bus_compression",
            Condition::BusEqBoost { .. } => "bus_eq_boost",
            Condition::BusEqCut { .. } => "bus_eq_cut",
        }
    }

    /// Evaluated against bus params rather than tracks
    pub fn is_bus_scoped(&self) -> bool {
        matches!(
            self,
            Condition::BusCompression { .. } | Condition::BusEqBoost { .. } | Condition::BusEqCut { .. }
        )
    }

    /// Track ids this condition reads
    pub fn referenced_tracks(&self) -> Vec<&str> {
        match self {
            Condition::FrequencySeparation { track1, track2, .. }
            | Condition::PanSpread { track1, track2, .. }
            | Condition::PanOpposite { track1, track2 }
            | Condition::VolumeLouder { track1, track2 }
            | Condition::VolumeBalanced { track1, track2, .. } => vec![track1.as_str(), track2.as_str()],
            Condition::RelativeLevel { louder, quieter, .. } => vec![louder.as_str(), quieter.as_str()],
            Condition::ReverbContrast { dry_track, wet_track, .. } => vec![dry_track.as_str(), wet_track.as_str()],
            Condition::CompressionContrast {
                more_compressed,
                less_compressed,
                ..
            } => vec![more_compressed.as_str(), less_compressed.as_str()],
            Condition::EqCut { track, .. }
            | Condition::EqBoost { track, .. }
            | Condition::PanPosition { track, .. }
            | Condition::ReverbAmount { track, .. }
            | Condition::DepthPlacement { track, .. }
            | Condition::VolumeRange { track, .. }
            | Condition::TrackCompression { track, .. } => vec![track.as_str()],
            Condition::Balance { .. }
            | Condition::BusCompression { .. }
            | Condition::BusEqBoost { .. }
            | Condition::BusEqCut { .. } => Vec::new(),
        }
    }

    /// Evaluate against whichever scope the kind belongs to
    pub fn evaluate(&self, tracks: &TrackMap, bus: Option<&BusParams>) -> bool {
        if self.is_bus_scoped() {
            self.evaluate_bus(bus)
        } else {
            self.evaluate_tracks(tracks)
        }
    }

    /// Per-track evaluation; bus kinds are never satisfied here
    pub fn evaluate_tracks(&self, tracks: &TrackMap) -> bool {
        if self.is_bus_scoped() {
            return false;
        }
        self.resolve(self.check(tracks, None))
    }

    /// Bus evaluation; per-track kinds are never satisfied here
    pub fn evaluate_bus(&self, bus: Option<&BusParams>) -> bool {
        if !self.is_bus_scoped() {
            return false;
        }
        self.resolve(self.check(&TrackMap::new(), bus))
    }

    /// Missing data fails the condition
    fn resolve(&self, outcome: Option<bool>) -> bool {
        match outcome {
            Some(passed) => passed,
            None => {
                log::trace!("condition {} missing data, treated as unmet", self.kind());
                false
            }
        }
    }

    /// Raw predicate: `None` when a referenced track or control is absent
    pub fn check(&self, tracks: &TrackMap, bus: Option<&BusParams>) -> Option<bool> {
        let view = TrackView(tracks);

        match self {
            Condition::FrequencySeparation { track1, track2, band } => {
                let g1 = view.track(track1)?.band(*band);
                let g2 = view.track(track2)?.band(*band);
                Some(g1 <= 0.0 || g2 <= 0.0)
            }
            Condition::RelativeLevel { louder, quieter, band } => {
                Some(view.track(louder)?.band(*band) > view.track(quieter)?.band(*band))
            }
            Condition::EqCut { track, band, min_cut } => Some(view.track(track)?.band(*band) <= -*min_cut),
            Condition::EqBoost { track, band, min_boost } => {
                Some(view.track(track)?.band(*band) >= *min_boost)
            }
            Condition::Balance { .. } => Some(true),
            Condition::PanPosition { track, position } => Some(position.matches(view.pan(track)?)),
            Condition::PanSpread { track1, track2, min_spread } => {
                Some((view.pan(track1)? - view.pan(track2)?).abs() >= *min_spread)
            }
            Condition::PanOpposite { track1, track2 } => {
                let p1 = view.pan(track1)?;
                let p2 = view.pan(track2)?;
                let t = PAN_OPPOSITE_THRESHOLD;
                Some((p1 < -t && p2 > t) || (p1 > t && p2 < -t))
            }
            Condition::ReverbAmount { track, min_mix, max_mix } => {
                Some(within(view.reverb(track)?, *min_mix, *max_mix))
            }
            Condition::ReverbContrast {
                dry_track,
                wet_track,
                min_difference,
            } => Some(view.reverb(wet_track)? - view.reverb(dry_track)? >= *min_difference),
            Condition::DepthPlacement { track, depth } => Some(depth.matches(view.reverb(track)?)),
            Condition::VolumeLouder { track1, track2 } => {
                Some(view.volume(track1)? > view.volume(track2)?)
            }
            Condition::VolumeRange { track, min_db, max_db } => {
                let vol = view.volume(track)?;
                Some(vol >= *min_db && vol <= *max_db)
            }
            Condition::VolumeBalanced { track1, track2, tolerance } => {
                Some((view.volume(track1)? - view.volume(track2)?).abs() <= *tolerance)
            }
            Condition::TrackCompression {
                track,
                min_amount,
                max_amount,
            } => Some(within(view.compression(track)?, *min_amount, *max_amount)),
            Condition::CompressionContrast {
                more_compressed,
                less_compressed,
                min_difference,
            } => Some(
                view.compression(more_compressed)? - view.compression(less_compressed)? >= *min_difference,
            ),
            Condition::BusCompression { min_amount, max_amount } => {
                let amount = bus?.compressor?.amount;
                Some(within(amount, *min_amount, *max_amount))
            }
            Condition::BusEqBoost { band, min_boost } => Some(bus?.eq?.get(*band) >= *min_boost),
            Condition::BusEqCut { band, min_cut } => Some(bus?.eq?.get(*band) <= -*min_cut),
        }
    }

    /// Human-readable statement of the goal
    pub fn describe(&self) -> String {
        match self {
            Condition::FrequencySeparation { track1, track2, band } => format!(
                "{} and {} should not both boost the {} frequencies",
                track1, track2, band
            ),
            Condition::RelativeLevel { louder, quieter, band } => {
                format!("{} should have more {} than {}", louder, band, quieter)
            }
            Condition::EqCut { track, band, min_cut } => {
                format!("Cut the {} on {} by at least {} dB", band, track, min_cut)
            }
            Condition::EqBoost { track, band, min_boost } => {
                format!("Boost the {} on {} by at least {} dB", band, track, min_boost)
            }
            Condition::Balance { description } => description.clone(),
            Condition::PanPosition { track, position } => match position {
                PanPosition::Center => format!("Keep {} in the center", track),
                side => format!("Pan {} to the {}", track, side),
            },
            Condition::PanSpread { track1, track2, min_spread } => format!(
                "Spread {} and {} at least {} apart in the stereo field",
                track1, track2, min_spread
            ),
            Condition::PanOpposite { track1, track2 } => {
                format!("Pan {} and {} to opposite sides", track1, track2)
            }
            Condition::ReverbAmount { track, min_mix, max_mix } => match max_mix {
                Some(max) => format!("Set {} reverb between {}% and {}%", track, min_mix, max),
                None => format!("Give {} at least {}% reverb", track, min_mix),
            },
            Condition::ReverbContrast {
                dry_track,
                wet_track,
                min_difference,
            } => format!(
                "{} should have at least {}% more reverb than {}",
                wet_track, min_difference, dry_track
            ),
            Condition::DepthPlacement { track, depth } => {
                format!("Place {} at the {} of the mix", track, depth)
            }
            Condition::VolumeLouder { track1, track2 } => {
                format!("{} should be louder than {}", track1, track2)
            }
            Condition::VolumeRange { track, min_db, max_db } => {
                format!("Set {} volume between {} dB and {} dB", track, min_db, max_db)
            }
            Condition::VolumeBalanced { track1, track2, tolerance } => format!(
                "Keep {} and {} within {} dB of each other",
                track1, track2, tolerance
            ),
            Condition::TrackCompression {
                track,
                min_amount,
                max_amount,
            } => match max_amount {
                Some(max) => format!("Compress {} between {}% and {}%", track, min_amount, max),
                None => format!("Compress {} by at least {}%", track, min_amount),
            },
            Condition::CompressionContrast {
                more_compressed,
                less_compressed,
                min_difference,
            } => format!(
                "Compress {} at least {}% more than {}",
                more_compressed, min_difference, less_compressed
            ),
            Condition::BusCompression { min_amount, max_amount } => match max_amount {
                Some(max) => format!("Set bus compression between {}% and {}%", min_amount, max),
                None => format!("Apply at least {}% bus compression", min_amount),
            },
            Condition::BusEqBoost { band, min_boost } => {
                format!("Boost the bus {} by at least {} dB", band, min_boost)
            }
            Condition::BusEqCut { band, min_cut } => {
                format!("Cut the bus {} by at least {} dB", band, min_cut)
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Outcome of one goal condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResult {
    /// Condition kind
    pub kind: String,
    /// Human-readable goal
    pub description: String,
    /// Whether it was met
    pub passed: bool,
}

/// Goal-challenge scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalScore {
    /// Per-condition outcomes, in authoring order
    pub conditions: Vec<ConditionResult>,
    /// Number of conditions met
    pub passed_count: usize,
    /// Rounded percentage of conditions met
    pub total: u8,
}

impl GoalScore {
    /// Conditions that were not met
    pub fn unmet(&self) -> impl Iterator<Item = &ConditionResult> {
        self.conditions.iter().filter(|c| !c.passed)
    }
}

/// Run every condition; bus kinds against `bus`, the rest against `tracks`
pub fn evaluate_goals(conditions: &[Condition], tracks: &TrackMap, bus: Option<&BusParams>) -> GoalScore {
    let results: Vec<ConditionResult> = conditions
        .iter()
        .map(|condition| {
            let passed = condition.evaluate(tracks, bus);
            log::trace!("condition {} -> {}", condition.kind(), passed);
            ConditionResult {
                kind: condition.kind().to_string(),
                description: condition.describe(),
                passed,
            }
        })
        .collect();

    let passed_count = results.iter().filter(|r| r.passed).count();
    let total = ratio_score(passed_count, results.len());

    GoalScore {
        conditions: results,
        passed_count,
        total,
    }
}
