#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryKind {
    General,
    Tech,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeTab {
    General,
    Tech,
    Favorites,
}

impl HomeTab {
    pub const ALL: [HomeTab; 3] = [HomeTab::General, HomeTab::Tech, HomeTab::Favorites];

    pub fn label(self) -> &'static str {
        match self {
            HomeTab::General => "General",
            HomeTab::Tech => "Tech",
            HomeTab::Favorites => "Favorites",
        }
    }

    pub fn next(self) -> Self {
        match self {
            HomeTab::General => HomeTab::Tech,
            HomeTab::Tech => HomeTab::Favorites,
            HomeTab::Favorites => HomeTab::General,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            HomeTab::General => HomeTab::Favorites,
            HomeTab::Tech => HomeTab::General,
            HomeTab::Favorites => HomeTab::Tech,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub kind: CategoryKind,
}

const fn general(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
) -> Category {
    Category {
        id,
        title,
        description,
        icon,
        kind: CategoryKind::General,
    }
}

const fn tech(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
) -> Category {
    Category {
        id,
        title,
        description,
        icon,
        kind: CategoryKind::Tech,
    }
}

pub const CATEGORIES: &[Category] = &[
    general("general", "General Knowledge", "Recent facts and trivia", "◎"),
    general("pop", "Pop Culture 2025", "Series, films and trends", "▣"),
    general("history", "History & Geography", "Brazil and the world", "⌛"),
    general("sports", "Sports", "Football and the Olympics", "⚑"),
    general("enem", "ENEM & Entrance Exams", "Review and mock tests", "✎"),
    general("env", "Environment", "Climate and sustainability", "❦"),
    general("influencers", "Influencers", "Internet personalities", "◉"),
    general("art", "Languages & Art", "Literature and geek culture", "✿"),
    general("cities", "Cities & Capitals", "Tourism and local culture", "⌖"),
    general("tech_general", "Technology & Innovation", "AI, gadgets and startups", "⚡"),
    general("myths", "Brazilian Myths", "Folklore and legends", "✦"),
    general("music", "Music", "Hits and viral songs", "♫"),
    general("health", "Health & Wellbeing", "Quality of life", "♥"),
    general("math", "Mathematics", "Calculations and puzzles", "∑"),
    tech("tech_logic", "Logic & Algorithms", "Challenge your reasoning", "⚙"),
    tech("tech_db", "Databases", "SQL and data modelling", "⛁"),
    tech("tech_network", "Networking", "Infrastructure and protocols", "⇄"),
    tech("tech_prog", "Programming", "Python, Java, JS", "λ"),
    tech("tech_eng", "Software Engineering", "Processes and patterns", "▤"),
    tech("tech_cloud", "Cloud Computing", "AWS, Azure and concepts", "☁"),
    tech("tech_sec", "Information Security", "Cybersecurity and privacy law", "⚿"),
    tech("tech_concursos", "IT for Public Exams", "Questions from exam boards", "☑"),
];

pub fn find(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Categories shown on a home tab. Favorites keep registry order.
pub fn by_tab(tab: HomeTab, favorites: &[String]) -> Vec<&'static Category> {
    CATEGORIES
        .iter()
        .filter(|c| match tab {
            HomeTab::General => c.kind == CategoryKind::General,
            HomeTab::Tech => c.kind == CategoryKind::Tech,
            HomeTab::Favorites => favorites.iter().any(|f| f == c.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_general_and_tech_categories() {
        assert_eq!(by_tab(HomeTab::General, &[]).len(), 14);
        assert_eq!(by_tab(HomeTab::Tech, &[]).len(), 8);
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in CATEGORIES.iter().enumerate() {
            for b in &CATEGORIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn favorites_tab_keeps_registry_order_and_skips_unknown_ids() {
        let favs = vec![
            "math".to_string(),
            "gone".to_string(),
            "general".to_string(),
        ];
        let ids: Vec<&str> = by_tab(HomeTab::Favorites, &favs)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["general", "math"]);
    }

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(HomeTab::Favorites.next(), HomeTab::General);
        assert_eq!(HomeTab::General.prev(), HomeTab::Favorites);
    }

    #[test]
    fn find_unknown_is_none() {
        assert!(find("nope").is_none());
        assert_eq!(find("tech_db").map(|c| c.kind), Some(CategoryKind::Tech));
    }
}
