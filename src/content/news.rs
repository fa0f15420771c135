//! News and events feed

use once_cell::sync::Lazy;
use serde::Serialize;

/// A news item shown on the news & events page
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub date: &'static str,
}

/// An upcoming event shown on the news & events page
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub date: &'static str,
    pub link: &'static str,
}

static NEWS_ITEMS: Lazy<Vec<NewsItem>> = Lazy::new(|| {
    vec![
        NewsItem {
            id: 1,
            title: "New Student Visa Regulations Announced",
            description: "The government has announced updated visa regulations for international students, including extended post-study work opportunities.",
            date: "March 15, 2024",
        },
        NewsItem {
            id: 2,
            title: "Healthcare Coverage Expansion",
            description: "International students will now have access to expanded healthcare coverage, including mental health services.",
            date: "March 10, 2024",
        },
        NewsItem {
            id: 3,
            title: "Scholarship Program Launch",
            description: "A new scholarship program for international students has been launched, offering full tuition coverage.",
            date: "March 5, 2024",
        },
        NewsItem {
            id: 4,
            title: "Housing Support Initiative",
            description: "New housing support services announced for international students, including guaranteed first-year accommodation.",
            date: "March 1, 2024",
        },
        NewsItem {
            id: 5,
            title: "Online Learning Resources Enhanced",
            description: "A new platform with enhanced online learning resources has been launched, providing better support for international students.",
            date: "March 20, 2024",
        },
        NewsItem {
            id: 6,
            title: "Career Counseling Services Expanded",
            description: "Career counseling services have been expanded to include specialized guidance for international students.",
            date: "March 25, 2024",
        },
        NewsItem {
            id: 7,
            title: "Cultural Exchange Program Announced",
            description: "A cultural exchange program has been introduced, promoting greater integration and cross-cultural experiences.",
            date: "March 30, 2024",
        },
        NewsItem {
            id: 8,
            title: "Travel Grant for Research Students",
            description: "International research students can now apply for travel grants to attend conferences and workshops abroad.",
            date: "April 5, 2024",
        },
    ]
});

static EVENTS: Lazy<Vec<Event>> = Lazy::new(|| {
    vec![
        Event {
            id: 1,
            title: "Global Cultural Exchange Fair",
            description: "Join us for a day of cultural exchange, featuring traditional performances, food, and networking opportunities.",
            date: "April 15, 2024",
            link: "#",
        },
        Event {
            id: 2,
            title: "Career Development Workshop",
            description: "Learn about job opportunities and career development strategies for international students.",
            date: "April 20, 2024",
            link: "#",
        },
        Event {
            id: 3,
            title: "Language Exchange Meetup",
            description: "Practice different languages with native speakers in a friendly, casual environment.",
            date: "April 25, 2024",
            link: "#",
        },
        Event {
            id: 4,
            title: "Student Success Webinar",
            description: "Expert advice on academic success, time management, and cultural adaptation.",
            date: "May 1, 2024",
            link: "#",
        },
    ]
});

/// The news feed, newest items as curated
pub fn news_items() -> &'static [NewsItem] {
    &NEWS_ITEMS
}

/// Upcoming events
pub fn events() -> &'static [Event] {
    &EVENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_items_have_unique_ids() {
        let mut ids: Vec<u32> = news_items().iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), news_items().len());
    }

    #[test]
    fn test_feeds_are_nonempty() {
        assert!(!news_items().is_empty());
        assert!(!events().is_empty());
    }
}
