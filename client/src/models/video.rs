//! Video model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed category enumeration
///
/// Wire values must match the server-accepted strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Programming & Software Development")]
    ProgrammingSoftwareDevelopment,
    #[serde(rename = "Networking & Cybersecurity")]
    NetworkingCybersecurity,
    #[serde(rename = "Artificial Intelligence & Machine Learning")]
    ArtificialIntelligenceMachineLearning,
    #[serde(rename = "Data Science & Databases")]
    DataScienceDatabases,
    #[serde(rename = "Cloud Computing & DevOps")]
    CloudComputingDevOps,
    #[serde(rename = "IT Fundamentals & Certifications")]
    ItFundamentalsCertifications,
    #[serde(rename = "UI/UX Design & Tools")]
    UiUxDesignTools,
    #[serde(rename = "Game Development & AR/VR")]
    GameDevelopmentArVr,
    #[serde(rename = "Career & Soft Skills for IT")]
    CareerSoftSkillsForIt,
}

impl Category {
    /// All categories, in the order the picker presents them
    pub const ALL: [Category; 9] = [
        Category::ProgrammingSoftwareDevelopment,
        Category::NetworkingCybersecurity,
        Category::ArtificialIntelligenceMachineLearning,
        Category::DataScienceDatabases,
        Category::CloudComputingDevOps,
        Category::ItFundamentalsCertifications,
        Category::UiUxDesignTools,
        Category::GameDevelopmentArVr,
        Category::CareerSoftSkillsForIt,
    ];

    /// Get the category as its server-accepted string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProgrammingSoftwareDevelopment => "Programming & Software Development",
            Category::NetworkingCybersecurity => "Networking & Cybersecurity",
            Category::ArtificialIntelligenceMachineLearning => {
                "Artificial Intelligence & Machine Learning"
            }
            Category::DataScienceDatabases => "Data Science & Databases",
            Category::CloudComputingDevOps => "Cloud Computing & DevOps",
            Category::ItFundamentalsCertifications => "IT Fundamentals & Certifications",
            Category::UiUxDesignTools => "UI/UX Design & Tools",
            Category::GameDevelopmentArVr => "Game Development & AR/VR",
            Category::CareerSoftSkillsForIt => "Career & Soft Skills for IT",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|category| category.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Video entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub uploader_id: i64,
    pub uploader_username: String,
    pub uploader_profile_picture: Option<String>,
    pub views: u64,
    pub upload_date: DateTime<Utc>,
    pub video_file: Option<String>,
}

/// Validated upload payload, ready to be sent as multipart
#[derive(Debug, Clone)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_serde() {
        for category in Category::ALL {
            let encoded = serde_json::to_string(&category).expect("serialize");
            assert_eq!(encoded, format!("\"{}\"", category.as_str()));

            let decoded: Category = serde_json::from_str(&encoded).expect("deserialize");
            assert_eq!(decoded, category);
        }
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        assert!("Cooking & Baking".parse::<Category>().is_err());
        assert_eq!(
            "UI/UX Design & Tools".parse::<Category>(),
            Ok(Category::UiUxDesignTools)
        );
    }
}
