use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EnergyStats {
    pub total: f64,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Buckets a month number. Anything outside 3..=11 falls into Winter,
    /// including out-of-range values.
    pub fn from_month(month: i64) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

/// Average weekly energy per season; `None` when a season has no entries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct SeasonalAverages {
    pub spring: Option<f64>,
    pub summer: Option<f64>,
    pub autumn: Option<f64>,
    pub winter: Option<f64>,
}

impl SeasonalAverages {
    pub fn get(&self, season: Season) -> Option<f64> {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
            Season::Winter => self.winter,
        }
    }

    pub fn set(&mut self, season: Season, average: Option<f64>) {
        let slot = match season {
            Season::Spring => &mut self.spring,
            Season::Summer => &mut self.summer,
            Season::Autumn => &mut self.autumn,
            Season::Winter => &mut self.winter,
        };
        *slot = average;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Season, Option<f64>)> + '_ {
        Season::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}
