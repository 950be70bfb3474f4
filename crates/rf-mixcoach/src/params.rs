//! Learner parameter values
//!
//! Plain data handed over by the control surface. Values arrive already
//! within instrument ranges; nothing here validates or clamps them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three simplified EQ bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Low band
    Low,
    /// Mid band
    Mid,
    /// High band
    High,
}

impl Band {
    /// All bands in display order
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    /// Capitalized display name
    pub fn label(&self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::Mid => "Mid",
            Band::High => "High",
        }
    }

    /// Lowercase name as used in hints
    pub fn name(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Mid => "mid",
            Band::High => "high",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Simplified 3-band EQ, gains in dB (nominal range -12..12)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EqParams {
    /// Low band gain (dB)
    pub low: f64,
    /// Mid band gain (dB)
    pub mid: f64,
    /// High band gain (dB)
    pub high: f64,
}

impl EqParams {
    /// Create from three gains
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    /// Flat EQ
    pub fn flat() -> Self {
        Self::default()
    }

    /// Gain of one band
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Low => self.low,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }
}

/// Compressor controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorParams {
    /// Threshold (dB)
    pub threshold: f64,
    /// Amount (percent 0-100)
    pub amount: f64,
    /// Attack time (seconds), only for timing challenges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<f64>,
    /// Release time (seconds), only for timing challenges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<f64>,
}

impl CompressorParams {
    /// Threshold and amount only
    pub fn new(threshold: f64, amount: f64) -> Self {
        Self {
            threshold,
            amount,
            attack: None,
            release: None,
        }
    }

    /// Builder pattern: set attack and release (seconds)
    pub fn with_timings(mut self, attack: f64, release: f64) -> Self {
        self.attack = Some(attack);
        self.release = Some(release);
        self
    }

    /// Both timings declared
    pub fn has_timings(&self) -> bool {
        self.attack.is_some() && self.release.is_some()
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Parametric filter shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Low shelf
    Lowshelf,
    /// High shelf
    Highshelf,
    /// Bell / peaking
    Peaking,
}

/// One band of the parametric EQ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParametricBand {
    /// Filter shape
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// Corner / center frequency (Hz)
    pub frequency: f64,
    /// Gain (dB)
    pub gain: f64,
    /// Quality factor
    #[serde(rename = "Q", alias = "q")]
    pub q: f64,
}

impl ParametricBand {
    /// Low shelf at `frequency`
    pub fn low_shelf(frequency: f64, gain: f64) -> Self {
        Self {
            kind: FilterKind::Lowshelf,
            frequency,
            gain,
            q: 0.707,
        }
    }

    /// High shelf at `frequency`
    pub fn high_shelf(frequency: f64, gain: f64) -> Self {
        Self {
            kind: FilterKind::Highshelf,
            frequency,
            gain,
            q: 0.707,
        }
    }

    /// Peaking band
    pub fn peaking(frequency: f64, gain: f64, q: f64) -> Self {
        Self {
            kind: FilterKind::Peaking,
            frequency,
            gain,
            q,
        }
    }
}

/// Four ordered bands: low shelf, peak 1, peak 2, high shelf
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParametricEqParams {
    /// Bands in fixed order
    pub bands: [ParametricBand; 4],
}

impl ParametricEqParams {
    /// Create from the four bands in order
    pub fn new(
        low_shelf: ParametricBand,
        peak1: ParametricBand,
        peak2: ParametricBand,
        high_shelf: ParametricBand,
    ) -> Self {
        Self {
            bands: [low_shelf, peak1, peak2, high_shelf],
        }
    }

    /// Same layout with every gain negated
    pub fn inverted(&self) -> Self {
        let mut out = *self;
        for band in &mut out.bands {
            band.gain = -band.gain;
        }
        out
    }
}

impl Default for ParametricEqParams {
    fn default() -> Self {
        Self::new(
            ParametricBand::low_shelf(100.0, 0.0),
            ParametricBand::peaking(500.0, 0.0, 1.0),
            ParametricBand::peaking(2500.0, 0.0, 1.0),
            ParametricBand::high_shelf(8000.0, 0.0),
        )
    }
}

/// Per-track controls in a multi-track challenge
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackParams {
    /// Low band gain (dB)
    #[serde(default)]
    pub low: f64,
    /// Mid band gain (dB)
    #[serde(default)]
    pub mid: f64,
    /// High band gain (dB)
    #[serde(default)]
    pub high: f64,
    /// Pan position (-1 left .. 1 right)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<f64>,
    /// Reverb send mix (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverb_mix: Option<f64>,
    /// Fader level (dB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Track compressor amount (percent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor_amount: Option<f64>,
    /// Parametric EQ; when present it overrides low/mid/high
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parametric_eq: Option<ParametricEqParams>,
}

impl TrackParams {
    /// Track with only a simplified EQ set
    pub fn with_eq(eq: EqParams) -> Self {
        Self {
            low: eq.low,
            mid: eq.mid,
            high: eq.high,
            ..Default::default()
        }
    }

    /// Simplified EQ view
    pub fn eq(&self) -> EqParams {
        EqParams::new(self.low, self.mid, self.high)
    }

    /// Gain of one band
    pub fn band(&self, band: Band) -> f64 {
        self.eq().get(band)
    }

    /// Builder pattern: set pan
    pub fn pan(mut self, pan: f64) -> Self {
        self.pan = Some(pan);
        self
    }

    /// Builder pattern: set reverb mix
    pub fn reverb(mut self, mix: f64) -> Self {
        self.reverb_mix = Some(mix);
        self
    }

    /// Builder pattern: set volume
    pub fn volume(mut self, db: f64) -> Self {
        self.volume = Some(db);
        self
    }

    /// Builder pattern: set compressor amount
    pub fn compression(mut self, amount: f64) -> Self {
        self.compressor_amount = Some(amount);
        self
    }

    /// Builder pattern: attach a parametric EQ
    pub fn parametric(mut self, eq: ParametricEqParams) -> Self {
        self.parametric_eq = Some(eq);
        self
    }
}

/// Track id → track params, iterated in id order
pub type TrackMap = BTreeMap<String, TrackParams>;

/// Bus compressor controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusCompressor {
    /// Amount (percent)
    pub amount: f64,
}

/// Shared bus processing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BusParams {
    /// Bus compressor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor: Option<BusCompressor>,
    /// Bus EQ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<EqParams>,
}

impl BusParams {
    /// Builder pattern: set bus compressor amount
    pub fn with_compression(mut self, amount: f64) -> Self {
        self.compressor = Some(BusCompressor { amount });
        self
    }

    /// Builder pattern: set bus EQ
    pub fn with_eq(mut self, eq: EqParams) -> Self {
        self.eq = Some(eq);
        self
    }
}
