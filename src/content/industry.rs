//! Industry detection and the company outline derived from it.

use serde::Serialize;

/// Industry family used to parameterize generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Automotive,
    Finance,
    Healthcare,
    Retail,
    Manufacturing,
    Education,
    Technology,
}

/// Keywords matched against the industry field, then against the description.
const SIGNALS: &[(Industry, &[&str], &[&str])] = &[
    (
        Industry::Automotive,
        &["automotive"],
        &["vehicle", "automotive", "car"],
    ),
    (
        Industry::Finance,
        &["finance", "banking"],
        &["financial", "bank", "payment"],
    ),
    (
        Industry::Healthcare,
        &["healthcare", "medical"],
        &["health", "medical", "clinical"],
    ),
    (
        Industry::Retail,
        &["retail", "e-commerce"],
        &["retail", "ecommerce", "e-commerce", "shopping"],
    ),
    (
        Industry::Manufacturing,
        &["manufacturing"],
        &["production", "manufacturing"],
    ),
    (Industry::Education, &["education"], &["learning", "education"]),
];

impl Industry {
    /// Classify a company. The industry field wins over description keywords,
    /// so "healthcare" in the industry is never shadowed by "car" in a description.
    pub fn detect(industry: &str, description: &str) -> Self {
        let industry = industry.to_lowercase();
        let description = description.to_lowercase();
        SIGNALS
            .iter()
            .find(|(_, keys, _)| keys.iter().any(|k| industry.contains(k)))
            .or_else(|| {
                SIGNALS
                    .iter()
                    .find(|(_, _, keys)| keys.iter().any(|k| description.contains(k)))
            })
            .map_or(Industry::Technology, |(ind, _, _)| *ind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automotive => "automotive",
            Self::Finance => "finance",
            Self::Healthcare => "healthcare",
            Self::Retail => "retail",
            Self::Manufacturing => "manufacturing",
            Self::Education => "education",
            Self::Technology => "technology",
        }
    }

    pub fn topics(self) -> &'static [&'static str] {
        match self {
            Self::Automotive => &[
                "Electric vehicle development",
                "Autonomous driving technology",
                "Vehicle connectivity",
                "Battery technology",
                "Safety systems",
                "New vehicle launches",
                "Dealer network management",
            ],
            Self::Finance => &[
                "Risk management",
                "Regulatory compliance",
                "Trading operations",
                "Payment processing",
                "Fraud detection",
                "Investment strategies",
                "Customer financial services",
            ],
            Self::Healthcare => &[
                "Patient care",
                "Clinical trials",
                "Medical research",
                "Healthcare compliance",
                "Telemedicine",
                "Medical device development",
                "Pharmaceutical research",
            ],
            Self::Retail => &[
                "Inventory management",
                "Supply chain optimization",
                "Customer experience",
                "Store operations",
                "E-commerce platform",
                "Merchandising strategies",
            ],
            Self::Manufacturing => &[
                "Production optimization",
                "Quality control",
                "Supply chain management",
                "Machinery maintenance",
                "Assembly line efficiency",
                "Warehouse operations",
            ],
            Self::Education => &[
                "Curriculum development",
                "Student support",
                "Educational research",
                "Online learning platforms",
                "Faculty collaboration",
                "Admissions management",
            ],
            Self::Technology => &[],
        }
    }

    /// Industry-specific channels with their approximate member counts.
    pub fn channels(self) -> &'static [(&'static str, u32)] {
        match self {
            Self::Automotive => &[
                ("autonomous-driving", 42),
                ("electric-vehicles", 68),
                ("vehicle-connectivity", 35),
                ("battery-tech", 28),
                ("safety-systems", 40),
                ("engine-development", 32),
                ("new-launches", 52),
                ("dealer-network", 62),
                ("quality-assurance", 30),
            ],
            Self::Finance => &[
                ("payment-security", 44),
                ("fraud-detection", 37),
                ("transaction-monitoring", 29),
                ("risk-management", 33),
                ("regulatory-compliance", 26),
            ],
            Self::Healthcare => &[
                ("clinical-trials", 31),
                ("patient-care", 58),
                ("medical-devices", 27),
                ("telemedicine", 34),
                ("healthcare-compliance", 22),
            ],
            Self::Retail => &[
                ("inventory", 36),
                ("supply-chain", 41),
                ("store-operations", 64),
                ("ecommerce", 47),
                ("merchandising", 25),
            ],
            Self::Manufacturing => &[
                ("production-line", 55),
                ("quality-control", 38),
                ("supply-chain", 41),
                ("maintenance", 24),
                ("warehouse-ops", 30),
            ],
            Self::Education => &[
                ("curriculum", 29),
                ("student-support", 46),
                ("online-learning", 35),
                ("admissions", 21),
                ("faculty", 40),
            ],
            Self::Technology => &[
                ("api-development", 39),
                ("platform", 45),
                ("data-engineering", 27),
                ("security", 33),
                ("ai-powered-dev", 51),
            ],
        }
    }
}

/// Channel family with its purpose and example channel names.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelType {
    pub kind: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

pub const CHANNEL_TYPES: &[ChannelType] = &[
    ChannelType {
        kind: "engineering",
        description: "Technical discussions, code reviews, and engineering best practices",
        examples: &["#engineering", "#backend", "#frontend", "#api", "#mobile", "#devops"],
    },
    ChannelType {
        kind: "product",
        description: "Product planning, feature discussions, and roadmap updates",
        examples: &["#product", "#design", "#ux-research", "#roadmap", "#features"],
    },
    ChannelType {
        kind: "operations",
        description: "Incident management, infrastructure updates, and operational excellence",
        examples: &["#incidents", "#on-call", "#infrastructure", "#monitoring", "#alerts"],
    },
    ChannelType {
        kind: "sales",
        description: "Sales updates, customer discussions, and revenue tracking",
        examples: &["#sales", "#deals", "#customer-success", "#revenue"],
    },
    ChannelType {
        kind: "marketing",
        description: "Marketing campaigns, content planning, and brand discussions",
        examples: &["#marketing", "#content", "#campaigns", "#brand"],
    },
    ChannelType {
        kind: "support",
        description: "Customer support, ticket management, and help desk",
        examples: &["#support", "#help-desk", "#customer-support", "#tickets"],
    },
    ChannelType {
        kind: "cross-functional",
        description: "Company-wide announcements and cross-team collaboration",
        examples: &["#general", "#announcements", "#all-hands", "#random"],
    },
];

/// A role the workspace's people plausibly hold.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    pub title: &'static str,
    pub responsibilities: &'static [&'static str],
}

/// Static company profile derived from industry and description.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyOutline {
    pub industry: Industry,
    pub topics: Vec<String>,
    pub roles: Vec<Role>,
    pub channel_types: &'static [ChannelType],
}

impl CompanyOutline {
    pub fn derive(industry_field: &str, description: &str) -> Self {
        let industry = Industry::detect(industry_field, description);
        let desc = description.to_lowercase();
        let mentions = |keys: &[&str]| keys.iter().any(|k| desc.contains(k));

        let mut topics: Vec<String> = industry.topics().iter().map(|t| t.to_string()).collect();
        let extra: &[(&[&str], &[&str])] = &[
            (
                &["software", "tech"],
                &[
                    "Software development and engineering",
                    "System architecture",
                    "Code quality",
                ],
            ),
            (
                &["product", "feature"],
                &[
                    "Product planning and feature development",
                    "User experience design",
                ],
            ),
            (
                &["customer", "client"],
                &["Customer success and support", "Client relationships"],
            ),
            (
                &["sales", "revenue"],
                &["Sales strategies", "Revenue growth", "Lead generation"],
            ),
            (
                &["marketing", "brand"],
                &["Marketing campaigns", "Brand awareness", "Content strategy"],
            ),
            (
                &["team", "collaboration"],
                &["Team collaboration", "Cross-functional projects"],
            ),
        ];
        for (keys, added) in extra {
            if mentions(keys) {
                topics.extend(added.iter().map(|t| t.to_string()));
            }
        }
        let mut seen = std::collections::HashSet::new();
        topics.retain(|t| seen.insert(t.clone()));
        if topics.is_empty() {
            topics = ["Team collaboration", "Project updates", "Company announcements"]
                .iter()
                .map(|t| t.to_string())
                .collect();
        }

        let mut roles = industry_roles(industry);
        if mentions(&["software", "tech", "engineering"]) {
            roles.push(Role {
                title: "Software Engineer",
                responsibilities: &[
                    "Write and review code",
                    "Design system architecture",
                    "Participate in technical discussions",
                ],
            });
        }
        if mentions(&["product", "feature"]) {
            roles.push(Role {
                title: "Product Manager",
                responsibilities: &[
                    "Define product roadmap",
                    "Gather user requirements",
                    "Coordinate cross-functional teams",
                ],
            });
        }
        if roles.is_empty() {
            roles.push(Role {
                title: "Team Member",
                responsibilities: &["Collaborate on projects", "Participate in team discussions"],
            });
        }

        Self {
            industry,
            topics,
            roles,
            channel_types: CHANNEL_TYPES,
        }
    }
}

fn industry_roles(industry: Industry) -> Vec<Role> {
    match industry {
        Industry::Automotive => vec![
            Role {
                title: "Automotive Software Engineer",
                responsibilities: &[
                    "Develop vehicle software",
                    "Work on autonomous driving systems",
                    "Integrate vehicle connectivity",
                ],
            },
            Role {
                title: "Vehicle Systems Engineer",
                responsibilities: &[
                    "Design safety systems",
                    "Test vehicle components",
                    "Optimize performance",
                ],
            },
        ],
        Industry::Finance => vec![
            Role {
                title: "Financial Analyst",
                responsibilities: &[
                    "Analyze market trends",
                    "Risk assessment",
                    "Regulatory compliance",
                ],
            },
            Role {
                title: "Payment Systems Engineer",
                responsibilities: &[
                    "Develop payment platforms",
                    "Ensure security",
                    "Monitor transactions",
                ],
            },
        ],
        Industry::Healthcare => vec![
            Role {
                title: "Clinical Research Specialist",
                responsibilities: &[
                    "Manage clinical trials",
                    "Analyze medical data",
                    "Ensure compliance",
                ],
            },
            Role {
                title: "Healthcare Technology Engineer",
                responsibilities: &[
                    "Develop medical software",
                    "Build telemedicine platforms",
                    "Ensure HIPAA compliance",
                ],
            },
        ],
        Industry::Retail => vec![
            Role {
                title: "E-commerce Engineer",
                responsibilities: &[
                    "Develop online platforms",
                    "Optimize user experience",
                    "Manage inventory systems",
                ],
            },
            Role {
                title: "Supply Chain Manager",
                responsibilities: &[
                    "Manage logistics",
                    "Optimize inventory",
                    "Coordinate suppliers",
                ],
            },
        ],
        Industry::Manufacturing | Industry::Education | Industry::Technology => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_detect_from_field() {
        assert_eq!(
            Industry::detect("Automotive Technology & Digital Services", ""),
            Industry::Automotive
        );
        assert_eq!(Industry::detect("Banking", ""), Industry::Finance);
        assert_eq!(Industry::detect("E-commerce", ""), Industry::Retail);
    }

    #[test]
    fn test_industry_field_beats_description() {
        // "care" contains "car"; the field must decide first.
        assert_eq!(
            Industry::detect("Healthcare", "We provide patient care everywhere"),
            Industry::Healthcare
        );
    }

    #[test]
    fn test_industry_detect_from_description() {
        assert_eq!(
            Industry::detect("", "A modern payment gateway"),
            Industry::Finance
        );
        assert_eq!(
            Industry::detect("Services", "Online learning for everyone"),
            Industry::Education
        );
        assert_eq!(Industry::detect("", ""), Industry::Technology);
    }

    #[test]
    fn test_outline_default_topics_and_roles() {
        let outline = CompanyOutline::derive("Consulting", "We help people");
        assert_eq!(outline.industry, Industry::Technology);
        assert_eq!(
            outline.topics,
            vec!["Team collaboration", "Project updates", "Company announcements"]
        );
        assert_eq!(outline.roles.len(), 1);
        assert_eq!(outline.roles[0].title, "Team Member");
    }

    #[test]
    fn test_outline_automotive_with_tech_description() {
        let outline = CompanyOutline::derive(
            "Automotive",
            "Connected vehicle software and digital product features",
        );
        assert!(outline.topics.iter().any(|t| t == "Battery technology"));
        assert!(outline.topics.iter().any(|t| t == "System architecture"));
        let titles: Vec<_> = outline.roles.iter().map(|r| r.title).collect();
        assert_eq!(
            titles,
            vec![
                "Automotive Software Engineer",
                "Vehicle Systems Engineer",
                "Software Engineer",
                "Product Manager"
            ]
        );
        assert_eq!(outline.channel_types.len(), 7);
    }

    #[test]
    fn test_every_industry_has_channels() {
        for ind in [
            Industry::Automotive,
            Industry::Finance,
            Industry::Healthcare,
            Industry::Retail,
            Industry::Manufacturing,
            Industry::Education,
            Industry::Technology,
        ] {
            assert!(!ind.channels().is_empty(), "{ind:?}");
        }
    }
}
