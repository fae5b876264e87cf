//! Scenario text pools keyed by conversation category.
//!
//! Templates use `{slot}` placeholders filled from the profile
//! (`{company}`, `{topic}`, `{name}`, `{assistant}`, ...) and `{a|b|c}`
//! alternations resolved at fill time.

/// Conversation category bound to one scenario pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationCategory {
    General,
    Engineering,
    Incidents,
    Product,
    Quality,
    Operations,
    Sales,
    Support,
    Marketing,
    Social,
    Other,
}

/// Channel-id keywords per category, checked in order.
const KEYWORDS: &[(ConversationCategory, &[&str])] = &[
    (
        ConversationCategory::Incidents,
        &["incident", "on-call", "security", "fraud", "monitoring"],
    ),
    (
        ConversationCategory::Quality,
        &["quality", "qa", "testing", "compliance", "clinical", "risk", "safety"],
    ),
    (
        ConversationCategory::Operations,
        &[
            "supply",
            "inventory",
            "logistics",
            "warehouse",
            "production",
            "maintenance",
            "operations",
        ],
    ),
    (
        ConversationCategory::Engineering,
        &[
            "engineering",
            "backend",
            "frontend",
            "api",
            "devops",
            "platform",
            "sdk",
            "core",
            "dev",
            "battery",
            "connectivity",
            "autonomous",
            "engine",
        ],
    ),
    (
        ConversationCategory::Product,
        &[
            "product",
            "design",
            "growth",
            "launch",
            "vehicle",
            "roadmap",
            "curriculum",
            "merchandising",
            "ecommerce",
        ],
    ),
    (
        ConversationCategory::Sales,
        &["sales", "dealer", "revenue", "store", "admissions"],
    ),
    (
        ConversationCategory::Support,
        &["support", "service", "customer", "patient", "student", "warranty"],
    ),
    (
        ConversationCategory::Marketing,
        &["marketing", "campaign", "brand"],
    ),
    (
        ConversationCategory::Social,
        &["random", "food", "social", "fun", "lost"],
    ),
];

impl ConversationCategory {
    /// Classify a channel by id. Unknown channels land in `Other`.
    pub fn of(channel_id: &str) -> Self {
        if channel_id == "general" {
            return Self::General;
        }
        KEYWORDS
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| channel_id.contains(k)))
            .map_or(Self::Other, |(cat, _)| *cat)
    }

    /// Scenario lines spoken by people in this channel.
    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Self::General => GENERAL_LINES,
            Self::Engineering => ENGINEERING_LINES,
            Self::Incidents => INCIDENT_LINES,
            Self::Product => PRODUCT_LINES,
            Self::Quality => QUALITY_LINES,
            Self::Operations => OPERATIONS_LINES,
            Self::Sales => SALES_LINES,
            Self::Support => SUPPORT_LINES,
            Self::Marketing => MARKETING_LINES,
            Self::Social => SOCIAL_LINES,
            Self::Other => OTHER_LINES,
        }
    }

    /// Unprompted assistant posts.
    pub fn assistant_posts(self) -> &'static [&'static str] {
        match self {
            Self::Engineering => &[
                "I've completed an analysis of {topic} build metrics. Pipeline success rate is at 9{1|4|7}.{2|5|8}% this week. Recommendation: parallelise the integration suite for roughly {pct}% faster feedback.",
                "Code review turnaround for {topic} averaged {2|3|4} hours this sprint. The slowest reviews cluster on Fridays, so I suggest rotating reviewers.",
                "Dependency scan complete: no critical vulnerabilities, {2|3|4} minor updates available. I can open the upgrade PRs if that helps.",
            ],
            Self::Incidents => &[
                "Incident trend analysis: mean time to recovery dropped {pct}% over the last month. Most alerts originate from the same two services.",
                "I've correlated last night's alerts. {2|3|4} of them were duplicates from the same root cause. Suggest consolidating alert rules.",
            ],
            Self::Product => &[
                "Feature adoption analysis for {topic}: usage is up {pct}% since launch. Retention in the first week looks strong.",
                "I've summarised this week's customer feedback on {topic}. The top request is better reporting, mentioned in {pct}% of responses.",
            ],
            Self::Quality => &[
                "Quality metrics for {topic} are exceeding targets. Defect escape rate is down {pct}% quarter over quarter.",
                "Validation run complete: {pct} test scenarios flagged for review, none blocking. Ready for the next phase.",
            ],
            Self::Operations => &[
                "Operations analysis: throughput improved {pct}% this month. {topic} remains the main lever for further gains.",
                "I've reviewed capacity for next quarter. Current headroom covers expected demand with a {pct}% buffer.",
            ],
            Self::Sales => &[
                "Sales analysis: Q{1|2|3|4} targets exceeded by {pct}%. Customer satisfaction at 4.{6|7|8}/5.",
                "I've reviewed the pipeline. Strong performance across all regions, with {topic} deals leading growth.",
            ],
            Self::Support => &[
                "Support analysis: first response time improved by {pct}% with the new triage flow. CSAT is trending up.",
                "Ticket volume is stable this week. The top category is account access; I can draft a help-centre article for it.",
            ],
            Self::Marketing => &[
                "Campaign analysis: the {topic} campaign is outperforming benchmarks with a {pct}% higher click-through rate.",
                "I've compared this month's channels. Organic traffic grew {pct}%, mostly from the new content series.",
            ],
            Self::General | Self::Social | Self::Other => GENERIC_ASSISTANT_POSTS,
        }
    }

    /// Assistant replies to an @mention in this channel.
    pub fn assistant_replies(self) -> &'static [&'static str] {
        match self {
            Self::Engineering => &[
                "Based on current build data, I recommend caching dependencies between pipeline stages. That should cut build time by about {pct}%.",
                "I've analysed the service metrics. The bottleneck is connection setup; pooling would reduce p95 latency noticeably.",
                "Current error rates are stable. Recommendation: add tracing around the retry path before the next release.",
            ],
            Self::Incidents => &[
                "I've pulled the related alerts. The spike lines up with the last deploy; rolling back the config change should resolve it.",
                "Root cause candidates ranked by likelihood are in the incident doc. The top one accounts for most of the errors.",
                "Monitoring shows recovery is holding. I'll keep watching the error budget and flag anything unusual.",
            ],
            Self::Product => &[
                "For {topic}, the key metrics are activation rate, weekly retention and time to first value. All three are trending up.",
                "Based on feedback volume, I'd prioritise the reporting improvements first. They affect the most accounts.",
            ],
            Self::Sales => &[
                "Pipeline coverage is {2|3}.{1|5|8}x for the quarter. The largest deals are concentrated in {topic}.",
                "I've compared win rates by region. The strongest gains are where the new demo flow was rolled out.",
            ],
            Self::Support => &[
                "I've grouped open tickets by theme. Most relate to onboarding, so an updated guide would deflect a good share.",
                "Average handle time is down {pct}% this week. Escalations are mostly billing questions.",
            ],
            Self::General
            | Self::Quality
            | Self::Operations
            | Self::Marketing
            | Self::Social
            | Self::Other => GENERIC_ASSISTANT_REPLIES,
        }
    }
}

pub const GENERIC_ASSISTANT_POSTS: &[&str] = &[
    "I've analyzed the data and can provide insights. Based on current metrics, the system is performing well.",
    "Based on my analysis, I recommend focusing on these key areas for improvement.",
    "I've reviewed the latest data. Here are my findings and recommendations.",
];

pub const GENERIC_ASSISTANT_REPLIES: &[&str] = &[
    "I've analyzed the data and can provide insights. Based on current metrics, the system is performing well.",
    "Thank you for the mention. I can help optimize this further. Let me analyze the relevant data.",
    "Based on my analysis, I recommend focusing on these key areas for improvement.",
];

pub const GROUP_ASSISTANT_REPLIES: &[&str] = &[
    "I've analyzed the discussion and can provide insights. Based on the context, here's what I recommend.",
    "Thank you for mentioning me. I can help with that. Let me provide some relevant information.",
    "Based on my analysis of the topic, I suggest focusing on these key areas.",
    "I can help with that. Here's what I found from the latest data.",
    "Great question! Based on current metrics and best practices, here's my recommendation.",
];

const GENERAL_LINES: &[&str] = &[
    "Reminder: all-hands is {Thursday|Friday} at {10|11} AM. Bring your questions for leadership!",
    "Welcome to everyone who joined {company} this week! Say hi in the thread 👋",
    "The office in {hq} will be closed on Monday for maintenance. Remote work as usual.",
];

const ENGINEERING_LINES: &[&str] = &[
    "{topic} service {v2.0 release deployed successfully|latency improved by {pct}%|migration completed}. {All tests passing|Performance looks excellent|Ready for production}.",
    "Could someone review my PR for the {topic} integration? It's mostly refactoring, should be quick.",
    "Heads up: {staging|the CI cluster|the shared test environment} will be down for upgrades from 4 to 5 PM.",
    "Core API {rate limiting implemented|authentication enhanced|error handling improved}. {Security audit passed|Performance optimized|Ready for scale}.",
    "Hey @{assistant}, can you help {analyze the build failures from last night|review the query performance on the {topic} dashboard|summarize open tech debt for {topic}}?",
    "Nice work on the caching layer {name}, p95 dropped by {pct}% overnight.",
    "Postmortem for {ticket} is up. Main takeaway: we need better alerting on queue depth.",
    "Anyone else seeing flaky tests in the {topic} suite? Retrying seems to fix it but that's not great.",
];

const INCIDENT_LINES: &[&str] = &[
    "🚨 Investigating elevated error rates on the {topic} API. Updates in thread.",
    "Incident {ticket} resolved. Root cause was a misconfigured connection pool. Postmortem to follow.",
    "On-call handover: quiet night, {one|two|three} low-priority alerts, all acknowledged.",
    "Latency back to normal after the rollback. Keeping the incident open for another hour to be safe.",
    "@{assistant} can you pull the error budget burn for the last 24 hours?",
    "Reminder to update the runbook after every page, even if it was a false positive.",
];

const PRODUCT_LINES: &[&str] = &[
    "Roadmap review for {topic} is on {Tuesday|Wednesday}. Please add your items to the doc beforehand.",
    "User research sessions for {topic} wrapped up. {pct}% of participants asked for better reporting.",
    "New mockups for the {topic} flow are ready for feedback. Would love eyes from engineering too.",
    "Q{1|2|3|4} growth metrics {exceeded plan by {pct}%|on track|ahead of schedule}. {Onboarding up {pct}%|Retention looking strong|Customer satisfaction high}.",
    "@{assistant} what are the top feature requests for {topic} this month?",
    "We're launching the {topic} beta to {5|10|20}% of customers next week 🚀",
];

const QUALITY_LINES: &[&str] = &[
    "Quality gate for {topic} passed with zero critical findings.",
    "Test plan for the next release is ready. {pct} new scenarios added for {topic}.",
    "Audit prep: please make sure your {topic} documentation is up to date by Friday.",
    "Validation results are in: {topic} meets all targets. Great job everyone!",
    "@{assistant} can you summarize the open findings from last week's review?",
];

const OPERATIONS_LINES: &[&str] = &[
    "Throughput this week is up {pct}% thanks to the new scheduling changes.",
    "{topic}: planned maintenance window on Saturday 6 to 10 AM.",
    "Supplier update: the delayed shipment arrives {tomorrow|Thursday|early next week}.",
    "Capacity review for next quarter is scheduled. Please send your forecasts to {name}.",
];

const SALES_LINES: &[&str] = &[
    "Closed a {big|strategic|multi-year} deal with a new customer in {country} markets! 🎉",
    "Q{1|2|3|4} pipeline review tomorrow. Please update your opportunities by end of day.",
    "Revenue for the month is tracking {pct}% above plan. Great work team.",
    "Anyone have a good case study on {topic} I can share with a prospect?",
    "@{assistant} which accounts had the biggest usage growth this quarter?",
];

const SUPPORT_LINES: &[&str] = &[
    "Ticket backlog is down to {12|18|25} after yesterday's push. Thanks all!",
    "Seeing a few reports about login issues, escalating to engineering.",
    "New macro added for {topic} questions. Should save some typing.",
    "CSAT this week: 4.{5|6|7|8}/5. Customers love the faster responses.",
    "@{assistant} can you draft a reply template for billing questions?",
];

const MARKETING_LINES: &[&str] = &[
    "The {topic} campaign goes live on Monday. Final assets are in the shared drive.",
    "Blog post on {topic} published. Please share it on your networks!",
    "Webinar registrations passed {num}. Thanks for promoting it everyone.",
    "Brand guidelines were updated; please use the new templates going forward.",
];

const SOCIAL_LINES: &[&str] = &[
    "Who's up for lunch at the new place around the corner? 🍜",
    "Found a {blue|black|grey} water bottle in meeting room {2|3|4}. It's at reception.",
    "Happy Friday everyone! Any weekend plans?",
    "Coffee machine on the {second|third} floor is fixed ☕",
    "Photos from the team offsite are up, great memories!",
];

const OTHER_LINES: &[&str] = &[
    "Quick update on {topic}: things are moving along nicely.",
    "Thanks for the input on yesterday's discussion, I've updated the doc.",
    "Does anyone have context on the {topic} decision from last quarter?",
    "Sharing notes from today's sync in the thread.",
    "@{assistant} could you summarize this week's discussion here?",
];

/// Long-form company announcements for the general channel, rotated in order.
pub const ANNOUNCEMENTS: &[&str] = &[
    "<strong>🚀 {company} Strategic Initiatives</strong><br><br>Excited to share our priorities for the coming quarter:<br>• {topic}<br>• {topic2}<br>• {topic3}<br><br>Thank you all for the incredible work so far. Let's make this our best quarter yet!",
    "<strong>🏆 Milestone achieved!</strong><br><br>We've just crossed {num} customers using our {topic} offering. This is a huge achievement for the whole company. Congratulations to every team that made it happen!",
    "<strong>👋 Welcome new team members</strong><br><br>Please join me in welcoming our newest colleagues joining the {topic} and {topic2} teams this month. Say hello and help them feel at home!",
    "<strong>📢 Upcoming events</strong><br><br>• All-hands on Thursday at 10 AM<br>• {topic} knowledge session on Friday<br>• Quarterly planning kicks off next week<br><br>Calendar invites are on their way.",
    "<strong>💡 Innovation spotlight: {topic}</strong><br><br>Our teams delivered a {pct}% improvement this quarter. Special thanks to {name} and {name2} for leading the effort. Incredible work!",
    "<strong>🎉 Quarterly results</strong><br><br>Revenue grew {pct}% year over year and customer satisfaction reached an all-time high. Proud to share this with all of you. Thank you for your dedication!",
    "<strong>🌍 Growing in {hq}</strong><br><br>We're expanding our presence with new roles across {topic} and {topic2}. Referrals are very welcome, please share with your networks.",
    "<strong>📊 Engagement survey results</strong><br><br>{pct}% participation, our highest ever. Top strengths: collaboration and {topic}. We'll share action plans in the next all-hands.",
];

/// First stage of a 1:1 DM: the colleague opens.
pub const DM_OPENERS: &[&str] = &[
    "Hey {me}! Quick question, do you have a minute to look at the PR I just opened? It's related to the {topic} work we discussed.",
    "Morning! I wanted to follow up on yesterday's incident. The post-mortem doc is ready, mind taking a look when you get a chance?",
    "Hey! Just wanted to say thanks for helping debug that issue yesterday. Your suggestion about checking the metrics was <em>spot on</em>.",
    "Quick heads up, I'm deploying the {topic} changes around 2 PM today. Should be low risk, but wanted to let you know in case anything comes up.",
    "Hey! I saw your message in #engineering about performance. I've been seeing similar patterns, want to sync up on this?",
    "Morning! Quick question about the dashboard, are you seeing the same latency spikes I'm noticing?",
    "Hey! I'm working on the incident response playbook and wanted to get your input on the escalation process. When are you free to chat?",
    "Thanks for the code review! Your feedback on the error handling was really helpful. I've addressed all the comments.",
    "Hey! Just wanted to check in, how's the {topic} migration going? Let me know if you hit any blockers.",
    "Morning! I saw the metrics improved after your changes yesterday. <em>Nice work!</em> The p95 latency is down significantly.",
];

/// Second stage: the viewer answers.
pub const DM_REPLIES: &[&str] = &[
    "Sure thing! I'll take a look this afternoon.",
    "Thanks for the heads up! I'll keep an eye on it.",
    "No problem at all, happy to help!",
    "Sounds good, thanks for letting me know.",
    "Yeah, I've been seeing that too. Let's sync up later today.",
    "Good catch! I'll investigate on my end as well.",
    "I'm free around 2 PM if that works for you.",
    "Glad I could help! Let me know if you need anything else.",
    "Great to hear it went smoothly!",
];

/// Third stage: the colleague wraps up.
pub const DM_CLOSERS: &[&str] = &[
    "Perfect, thanks {me}!",
    "Awesome, appreciate it 🙏",
    "Great, I'll send over the details.",
    "Sounds good, talk soon!",
    "Thanks! I'll ping you if anything changes.",
    "Will do. Have a good one!",
];

pub const GROUP_LINES: &[&str] = &[
    "Hey team!",
    "What do you think?",
    "Sounds good to me.",
    "Morning everyone!",
    "Ready for the meeting?",
    "Let's sync up.",
    "I'll share the notes after the call.",
    "Can we push this to tomorrow?",
    "Thanks for the help!",
    "Let me know when you're free.",
    "Adding @{assistant} for a quick summary of {topic}.",
];

/// Foreground nudges the assistant posts into its own DM.
pub const HR_NUDGES: &[&str] = &[
    "You have 2 pending leave requests that need your review.",
    "{name}'s leave request is still pending approval.",
    "Your team's time-off calendar has been updated.",
    "New expense reports submitted by your direct reports.",
];

/// Hand-authored assistant DM: (days ago, hour, minute, viewer prompt, assistant answer).
pub const ASSISTANT_DM_SCRIPT: &[(i64, u32, u32, &str, &str)] = &[
    (
        3,
        10,
        30,
        "Hey {assistant}, can you help me understand our current {topic} performance?",
        "Of course! Across the last 30 days, {topic} metrics are trending positively: throughput is up {pct}% and error rates are at their lowest this year. Would you like a breakdown by team?",
    ),
    (
        2,
        14,
        15,
        "What kind of insights can you provide?",
        "I can summarise channel activity, surface metrics from dashboards, track approvals such as leave and tool access requests, and flag anything that needs your attention.",
    ),
    (
        1,
        11,
        45,
        "Tell me about {topic2} performance",
        "{topic2} is on track. The latest milestone was delivered on schedule and customer feedback scores are up {pct}% quarter over quarter.",
    ),
    (
        0,
        9,
        20,
        "What about our internal systems?",
        "All core systems are healthy. Uptime this month is 99.9{5|7|9}%, and there are no open high-priority incidents.",
    ),
];

/// Tools offered in access requests.
pub const TOOLS: &[&str] = &[
    "Salesforce",
    "Jira",
    "Confluence",
    "GitHub Enterprise",
    "Figma",
    "Tableau",
];

pub const TOOL_REASONS: &[&str] = &[
    "Project access",
    "Team collaboration",
    "Data analysis",
    "Design work",
    "Development access",
];

pub const THANK_YOU: &str = "Thank you so much for the prompt approval! 🙏 Really appreciate it! 🎉";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_of_known_channels() {
        use ConversationCategory::*;
        assert_eq!(ConversationCategory::of("general"), General);
        assert_eq!(ConversationCategory::of("backend"), Engineering);
        assert_eq!(ConversationCategory::of("on-call"), Incidents);
        assert_eq!(ConversationCategory::of("product-planning"), Product);
        assert_eq!(ConversationCategory::of("production-line"), Operations);
        assert_eq!(ConversationCategory::of("sales-updates"), Sales);
        assert_eq!(ConversationCategory::of("customer-support"), Support);
        assert_eq!(ConversationCategory::of("marketing-campaigns"), Marketing);
        assert_eq!(ConversationCategory::of("random"), Social);
        assert_eq!(ConversationCategory::of("safety-systems"), Quality);
        assert_eq!(ConversationCategory::of("telemedicine"), Other);
    }

    #[test]
    fn test_every_category_has_non_empty_pools() {
        use ConversationCategory::*;
        for cat in [
            General, Engineering, Incidents, Product, Quality, Operations, Sales, Support,
            Marketing, Social, Other,
        ] {
            assert!(!cat.lines().is_empty(), "{cat:?}");
            assert!(!cat.assistant_posts().is_empty(), "{cat:?}");
            assert!(!cat.assistant_replies().is_empty(), "{cat:?}");
        }
    }
}
