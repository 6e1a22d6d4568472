//! Site content
//!
//! The static tables every section renders from. Content is plain data read
//! from the site file; the only logic here is filtering and validation.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Who the site is about
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    /// Biography paragraphs
    #[serde(default)]
    pub bio: Vec<String>,
}

/// Headline number on the About section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Stat {
    /// Icon name, resolved by the host
    #[serde(default)]
    pub icon: String,
    pub value: u32,
    #[serde(default)]
    pub suffix: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Highlight {
    #[serde(default)]
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    /// Proficiency percentage, 0 to 100
    pub level: u8,
    /// Featured skills get their own cards instead of a grid row
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    pub period: String,
    #[serde(default)]
    pub duties: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub location: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Certificate {
    pub title: String,
    pub issuer: String,
    pub year: u16,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Country {
    pub name: String,
    /// Flag emoji
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Footer {
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub nav: Vec<Link>,
    #[serde(default)]
    pub social: Vec<Link>,
}

/// Every content table on the page
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteContent {
    pub profile: Profile,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub footer: Footer,
}

/// Which skills the Skills grid shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SkillFilter {
    #[default]
    All,
    Category(String),
}

impl SkillFilter {
    pub fn matches(&self, skill: &Skill) -> bool {
        match self {
            SkillFilter::All => true,
            SkillFilter::Category(category) => skill.category == *category,
        }
    }
}

impl fmt::Display for SkillFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillFilter::All => f.write_str("All"),
            SkillFilter::Category(category) => f.write_str(category),
        }
    }
}

impl FromStr for SkillFilter {
    type Err = std::convert::Infallible;

    /// `all` in any case selects everything; anything else is a category name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(SkillFilter::All)
        } else {
            Ok(SkillFilter::Category(s.to_string()))
        }
    }
}

impl SiteContent {
    /// Skill categories in the order they first appear
    pub fn skill_categories(&self) -> Vec<&str> {
        self.skills
            .iter()
            .map(|skill| skill.category.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Grid skills under `filter`, featured skills excluded
    pub fn skills_for(&self, filter: &SkillFilter) -> Vec<&Skill> {
        self.skills
            .iter()
            .filter(|skill| !skill.featured && filter.matches(skill))
            .collect()
    }

    pub fn featured_skills(&self) -> Vec<&Skill> {
        self.skills.iter().filter(|skill| skill.featured).collect()
    }

    pub fn featured_certificates(&self) -> Vec<&Certificate> {
        self.certificates.iter().filter(|cert| cert.featured).collect()
    }

    /// Reject content no section can render
    pub fn validate(&self) -> Result<()> {
        require("profile.name", &self.profile.name)?;

        for (i, stat) in self.stats.iter().enumerate() {
            require(&format!("stats[{i}].label"), &stat.label)?;
        }
        for (i, highlight) in self.highlights.iter().enumerate() {
            require(&format!("highlights[{i}].title"), &highlight.title)?;
        }
        for (i, skill) in self.skills.iter().enumerate() {
            require(&format!("skills[{i}].name"), &skill.name)?;
            require(&format!("skills[{i}].category"), &skill.category)?;
            if skill.level > 100 {
                return Err(ConfigError::Invalid(format!(
                    "skill '{}' has level {} (maximum is 100)",
                    skill.name, skill.level
                )));
            }
        }
        for (i, job) in self.experience.iter().enumerate() {
            require(&format!("experience[{i}].company"), &job.company)?;
            require(&format!("experience[{i}].role"), &job.role)?;
        }
        for (i, school) in self.education.iter().enumerate() {
            require(&format!("education[{i}].degree"), &school.degree)?;
        }
        for (i, cert) in self.certificates.iter().enumerate() {
            require(&format!("certificates[{i}].title"), &cert.title)?;
        }
        for (i, country) in self.countries.iter().enumerate() {
            require(&format!("countries[{i}].name"), &country.name)?;
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ConfigError::Invalid(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
