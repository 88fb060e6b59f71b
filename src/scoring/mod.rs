//! Trait scoring and archetype classification.
//!
//! The intake quiz writes one integer score per assessment axis; once all
//! six axes are set, [`classify`] maps the snapshot to a result type and a
//! short prioritized tag list. Classification is a pure function over an
//! immutable [`TraitScores`] value, so the outcome never depends on the
//! order in which answers were recorded.

use serde::{Deserialize, Serialize};

/// The six assessment axes, in evaluation order.
///
/// The single-letter serde names match the axis codes used by the intake
/// content table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// S - total load currently carried (tasks, duties, worries).
    #[serde(rename = "S")]
    Strain,
    /// C - difficulty of keeping one's pace and routines.
    #[serde(rename = "C")]
    Control,
    /// T - sensitivity to small stimuli.
    #[serde(rename = "T")]
    Trigger,
    /// D - difficulty of the external situation itself.
    #[serde(rename = "D")]
    Difficulty,
    /// F - volatility of the situation.
    #[serde(rename = "F")]
    Flux,
    /// E - the default emotional gear (resting expression).
    #[serde(rename = "E")]
    Expression,
}

impl Axis {
    /// All axes in tag-evaluation priority order.
    pub const ALL: [Axis; 6] = [
        Axis::Strain,
        Axis::Control,
        Axis::Trigger,
        Axis::Difficulty,
        Axis::Flux,
        Axis::Expression,
    ];
}

/// One integer score per axis, each set by exactly one intake answer.
///
/// Zero means "not yet answered"; intake options carry values 1-5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores {
    pub strain: u8,
    pub control: u8,
    pub trigger: u8,
    pub difficulty: u8,
    pub flux: u8,
    pub expression: u8,
}

impl TraitScores {
    /// Write the score for one axis.
    pub fn set(&mut self, axis: Axis, value: u8) {
        match axis {
            Axis::Strain => self.strain = value,
            Axis::Control => self.control = value,
            Axis::Trigger => self.trigger = value,
            Axis::Difficulty => self.difficulty = value,
            Axis::Flux => self.flux = value,
            Axis::Expression => self.expression = value,
        }
    }

    /// Read the score for one axis.
    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Strain => self.strain,
            Axis::Control => self.control,
            Axis::Trigger => self.trigger,
            Axis::Difficulty => self.difficulty,
            Axis::Flux => self.flux,
            Axis::Expression => self.expression,
        }
    }
}

/// The six archetype classifications, wire value 1-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResultType {
    /// Type 1 - carrying too much at once (high combined S+C load).
    Overload,
    /// Type 2 - worn down by small stimuli (high T).
    Overstimulated,
    /// Type 3 - the situation itself is the weight (high D).
    HardTerrain,
    /// Type 4 - the ground keeps shifting (high F).
    Turbulence,
    /// Type 5 - tension or anger as the default gear (E = 5).
    TenseGear,
    /// Type 6 - flat or sunken default gear (E = 3 or 4).
    SunkenGear,
}

impl ResultType {
    /// All result types in wire order.
    pub const ALL: [ResultType; 6] = [
        ResultType::Overload,
        ResultType::Overstimulated,
        ResultType::HardTerrain,
        ResultType::Turbulence,
        ResultType::TenseGear,
        ResultType::SunkenGear,
    ];

    /// The 1-based wire code used by the result content table.
    pub fn code(self) -> u8 {
        match self {
            ResultType::Overload => 1,
            ResultType::Overstimulated => 2,
            ResultType::HardTerrain => 3,
            ResultType::Turbulence => 4,
            ResultType::TenseGear => 5,
            ResultType::SunkenGear => 6,
        }
    }
}

impl TryFrom<u8> for ResultType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ResultType::Overload),
            2 => Ok(ResultType::Overstimulated),
            3 => Ok(ResultType::HardTerrain),
            4 => Ok(ResultType::Turbulence),
            5 => Ok(ResultType::TenseGear),
            6 => Ok(ResultType::SunkenGear),
            other => Err(format!("result type code out of range: {other}")),
        }
    }
}

impl From<ResultType> for u8 {
    fn from(result: ResultType) -> Self {
        result.code()
    }
}

/// Diagnostic tag labels, gated by per-axis thresholds.
pub mod tags {
    pub const LOAD_HIGH: &str = "부담-양 많음";
    pub const UPKEEP_HARD: &str = "유지 어려움";
    pub const TRIGGER_SENSITIVE: &str = "자극 민감";
    pub const TERRAIN_HARD: &str = "조건 난이도 높음";
    pub const FLUX_HIGH: &str = "변동성 높음";
    pub const GEAR_TENSE: &str = "긴장/분노 기어";
    pub const GEAR_FLAT: &str = "무표정 기어";
    pub const GEAR_SUNKEN: &str = "가라앉음 기어";
}

/// Output of [`classify`]: one result type plus at most three tags in axis
/// priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub result: ResultType,
    pub tags: Vec<&'static str>,
}

/// Maximum number of tags surfaced with a result.
const MAX_TAGS: usize = 3;

/// Classify a complete trait-score snapshot.
///
/// Total: every combination of scores yields exactly one result type, even
/// outside the 0-5 range intake answers can produce. The rule table is
/// evaluated as an ordered decision list with a late emotional-gear
/// override:
///
/// 1. provisional type from F/D (tie on F == D goes to type 3), then from
///    the combined load `S + C`, then from T;
/// 2. `E == 5` with `C >= 3` forces type 5, `E == 3 | 4` with `C >= 3`
///    forces type 6, even over a provisional value;
/// 3. if nothing was ever set, fall back on E alone, then on the load.
pub fn classify(scores: &TraitScores) -> Classification {
    let TraitScores {
        strain: s,
        control: c,
        trigger: t,
        difficulty: d,
        flux: f,
        expression: e,
    } = *scores;
    // Widened so out-of-range inputs cannot overflow the sum.
    let load = u16::from(s) + u16::from(c);

    let mut result = if f >= 4 && f > d {
        Some(ResultType::Turbulence)
    } else if d >= 4 && d >= f {
        // F == D with both >= 4 lands here: the tie goes to type 3.
        Some(ResultType::HardTerrain)
    } else if load >= 7 {
        Some(ResultType::Overload)
    } else if t >= 4 {
        Some(ResultType::Overstimulated)
    } else {
        None
    };

    // Emotional-gear override, applied even over a provisional value.
    if e == 5 && c >= 3 {
        result = Some(ResultType::TenseGear);
    } else if (e == 3 || e == 4) && c >= 3 {
        result = Some(ResultType::SunkenGear);
    }

    let result = result.unwrap_or_else(|| {
        if e == 5 {
            ResultType::TenseGear
        } else if e == 3 || e == 4 {
            ResultType::SunkenGear
        } else if load >= 5 {
            ResultType::Overload
        } else {
            ResultType::Overstimulated
        }
    });

    Classification {
        result,
        tags: collect_tags(scores),
    }
}

/// Threshold-gated tags in fixed axis order S, C, T, D, F, E.
///
/// The E axis contributes at most one label: `E == 5` is checked before
/// `E == 3 | 4`. The collected list is truncated to the first three.
fn collect_tags(scores: &TraitScores) -> Vec<&'static str> {
    let mut collected = Vec::new();
    if scores.strain >= 4 {
        collected.push(tags::LOAD_HIGH);
    }
    if scores.control >= 4 {
        collected.push(tags::UPKEEP_HARD);
    }
    if scores.trigger >= 4 {
        collected.push(tags::TRIGGER_SENSITIVE);
    }
    if scores.difficulty >= 4 {
        collected.push(tags::TERRAIN_HARD);
    }
    if scores.flux >= 4 {
        collected.push(tags::FLUX_HIGH);
    }
    if scores.expression == 5 {
        collected.push(tags::GEAR_TENSE);
    } else if scores.expression == 3 {
        collected.push(tags::GEAR_FLAT);
    } else if scores.expression == 4 {
        collected.push(tags::GEAR_SUNKEN);
    }
    collected.truncate(MAX_TAGS);
    collected
}
