//! 上游不可用时使用的兜底数据

use crate::api::models::{Activity, DashboardStats, TopVolunteer, VolunteerOverview};

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_events: 24,
        total_volunteers: 180,
        total_participants: 1250,
        average_rating: 4.6,
    }
}

pub fn activities() -> Vec<Activity> {
    vec![
        Activity {
            title: "New event published".to_string(),
            description: "Green Earth Sustainability Fair is open for registration".to_string(),
            timestamp: "2 hours ago".to_string(),
        },
        Activity {
            title: "Volunteer milestone".to_string(),
            description: "150 volunteers joined this quarter".to_string(),
            timestamp: "1 day ago".to_string(),
        },
        Activity {
            title: "Report generated".to_string(),
            description: "Monthly participation report is ready".to_string(),
            timestamp: "3 days ago".to_string(),
        },
    ]
}

pub fn volunteer_overview() -> VolunteerOverview {
    VolunteerOverview {
        total_volunteers: 180,
        active_volunteers: 132,
        total_hours: 4200,
        top_volunteers: vec![
            TopVolunteer {
                name: "Amina Yusuf".to_string(),
                events_attended: 14,
                hours: 96,
            },
            TopVolunteer {
                name: "Daniel Mwangi".to_string(),
                events_attended: 11,
                hours: 80,
            },
        ],
    }
}
