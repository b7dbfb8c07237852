//! Interview configuration: what kind of interview, how the interviewer
//! behaves, and where the problem comes from.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The interview format being rehearsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    SystemDesign,
    LiveCoding,
    MlTheory,
    Coaching,
}

impl InterviewType {
    pub fn label(self) -> &'static str {
        match self {
            InterviewType::SystemDesign => "system design",
            InterviewType::LiveCoding => "live coding",
            InterviewType::MlTheory => "ML theory",
            InterviewType::Coaching => "coaching",
        }
    }
}

impl FromStr for InterviewType {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system_design" => Ok(InterviewType::SystemDesign),
            "live_coding" => Ok(InterviewType::LiveCoding),
            "ml_theory" => Ok(InterviewType::MlTheory),
            "coaching" => Ok(InterviewType::Coaching),
            other => Err(SessionError::Config(format!(
                "unknown interview type {other:?} (expected system_design, live_coding, ml_theory, or coaching)"
            ))),
        }
    }
}

/// How much the interviewer says per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Low,
    Medium,
    High,
}

impl FromStr for Verbosity {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Verbosity::Low),
            "medium" => Ok(Verbosity::Medium),
            "high" => Ok(Verbosity::High),
            other => Err(SessionError::Config(format!(
                "unknown verbosity {other:?} (expected low, medium, or high)"
            ))),
        }
    }
}

/// The interviewer's demeanor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Friendly,
    Neutral,
    Adversarial,
}

impl FromStr for Tone {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friendly" => Ok(Tone::Friendly),
            "neutral" => Ok(Tone::Neutral),
            "adversarial" => Ok(Tone::Adversarial),
            other => Err(SessionError::Config(format!(
                "unknown tone {other:?} (expected friendly, neutral, or adversarial)"
            ))),
        }
    }
}

/// Where the interview problem comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemSource {
    Random,
    Description,
    Url,
}

impl FromStr for ProblemSource {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(ProblemSource::Random),
            "description" => Ok(ProblemSource::Description),
            "url" => Ok(ProblemSource::Url),
            other => Err(SessionError::Config(format!(
                "unknown problem source {other:?} (expected random, description, or url)"
            ))),
        }
    }
}

/// Settings for one interview attempt. Sent verbatim when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSettings {
    pub interview_type: InterviewType,
    pub verbosity: Verbosity,
    pub tone: Tone,
    pub problem_source: ProblemSource,
    pub problem_description: Option<String>,
    pub problem_url: Option<String>,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            interview_type: InterviewType::SystemDesign,
            verbosity: Verbosity::Medium,
            tone: Tone::Neutral,
            problem_source: ProblemSource::Random,
            problem_description: None,
            problem_url: None,
        }
    }
}

impl InterviewSettings {
    /// Shallow-merge `patch` into these settings. Fields absent from the
    /// patch are left untouched; no cross-field validation is performed.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(interview_type) = patch.interview_type {
            self.interview_type = interview_type;
        }
        if let Some(verbosity) = patch.verbosity {
            self.verbosity = verbosity;
        }
        if let Some(tone) = patch.tone {
            self.tone = tone;
        }
        if let Some(problem_source) = patch.problem_source {
            self.problem_source = problem_source;
        }
        if let Some(problem_description) = patch.problem_description {
            self.problem_description = Some(problem_description);
        }
        if let Some(problem_url) = patch.problem_url {
            self.problem_url = Some(problem_url);
        }
    }
}

/// Partial settings update; `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub interview_type: Option<InterviewType>,
    pub verbosity: Option<Verbosity>,
    pub tone: Option<Tone>,
    pub problem_source: Option<ProblemSource>,
    pub problem_description: Option<String>,
    pub problem_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&InterviewType::SystemDesign).unwrap(),
            "\"system_design\""
        );
        assert_eq!(
            serde_json::to_string(&InterviewType::MlTheory).unwrap(),
            "\"ml_theory\""
        );
        assert_eq!(serde_json::to_string(&Tone::Adversarial).unwrap(), "\"adversarial\"");
        assert_eq!(serde_json::to_string(&Verbosity::Low).unwrap(), "\"low\"");
        assert_eq!(serde_json::to_string(&ProblemSource::Random).unwrap(), "\"random\"");
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!("panel".parse::<InterviewType>().is_err());
        assert!("shouty".parse::<Tone>().is_err());
        assert_eq!("live_coding".parse::<InterviewType>().unwrap(), InterviewType::LiveCoding);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut settings = InterviewSettings::default();
        settings.apply(SettingsPatch {
            tone: Some(Tone::Adversarial),
            verbosity: Some(Verbosity::Low),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.tone, Tone::Adversarial);
        assert_eq!(settings.verbosity, Verbosity::Low);
        // Untouched fields keep their defaults.
        assert_eq!(settings.interview_type, InterviewType::SystemDesign);
        assert_eq!(settings.problem_source, ProblemSource::Random);
        assert!(settings.problem_description.is_none());
    }

    #[test]
    fn patch_can_set_problem_text() {
        let mut settings = InterviewSettings::default();
        settings.apply(SettingsPatch {
            problem_source: Some(ProblemSource::Description),
            problem_description: Some("Design a URL shortener".to_string()),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.problem_source, ProblemSource::Description);
        assert_eq!(
            settings.problem_description.as_deref(),
            Some("Design a URL shortener")
        );
    }
}
