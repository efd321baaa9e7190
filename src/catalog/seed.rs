// Catalog seed module
// Built-in activity list and optional TOML seed file loading

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::error::SeedError;
use super::store::{Activity, Catalog};

/// Seed file layout: one `[activities."Name"]` table per activity
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    activities: Catalog,
}

/// The activities offered when no seed file is configured
pub fn default_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "Chess Club",
        Activity::new(
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
    );
    catalog.insert(
        "Programming Class",
        Activity::new(
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
    );
    catalog.insert(
        "Gym Class",
        Activity::new(
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
    );
    catalog.insert(
        "Soccer Team",
        Activity::new(
            "Team practices and competitive matches against other schools",
            "Mondays, Wednesdays, 4:00 PM - 6:00 PM",
            22,
            &["alex@mergington.edu", "maria@mergington.edu"],
        ),
    );
    catalog.insert(
        "Basketball Club",
        Activity::new(
            "Casual and competitive basketball sessions for all skill levels",
            "Tuesdays, Thursdays, 5:00 PM - 7:00 PM",
            18,
            &["tyler@mergington.edu", "nina@mergington.edu"],
        ),
    );
    catalog.insert(
        "Art Club",
        Activity::new(
            "Explore drawing, painting, and mixed media projects",
            "Wednesdays, 3:30 PM - 5:00 PM",
            16,
            &["isabella@mergington.edu", "leo@mergington.edu"],
        ),
    );
    catalog.insert(
        "Drama Club",
        Activity::new(
            "Acting workshops, rehearsals, and school productions",
            "Thursdays, 4:00 PM - 6:00 PM",
            25,
            &["harper@mergington.edu", "jack@mergington.edu"],
        ),
    );
    catalog.insert(
        "Debate Team",
        Activity::new(
            "Prepare for debates, practice public speaking, and compete",
            "Fridays, 4:00 PM - 5:30 PM",
            14,
            &["sarah@mergington.edu", "liam@mergington.edu"],
        ),
    );
    catalog.insert(
        "Science Club",
        Activity::new(
            "Hands-on experiments, science fairs, and research projects",
            "Mondays, 3:30 PM - 5:00 PM",
            20,
            &["zoe@mergington.edu", "ethan@mergington.edu"],
        ),
    );
    catalog
}

/// Load a catalog from a TOML seed file
pub fn load_seed_file(path: &Path) -> Result<Catalog, SeedError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: display.clone(),
        source,
    })?;

    let seed: SeedFile = toml::from_str(&content).map_err(|source| SeedError::Parse {
        path: display.clone(),
        source,
    })?;

    let mut catalog = seed.activities;
    if catalog.is_empty() {
        return Err(SeedError::Empty(display));
    }

    for (_, activity) in catalog.iter_mut() {
        collapse_duplicate_participants(activity);
    }
    Ok(catalog)
}

/// Built-in catalog, or the seed file when one is configured
pub fn load_catalog(seed_file: Option<&str>) -> Result<Catalog, SeedError> {
    seed_file.map_or_else(|| Ok(default_catalog()), |path| load_seed_file(Path::new(path)))
}

/// Keep the first occurrence of each email
fn collapse_duplicate_participants(activity: &mut Activity) {
    let mut seen = HashSet::new();
    activity
        .participants
        .retain(|email| seen.insert(email.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_seed(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_catalog() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.names().next(), Some("Chess Club"));

        let chess = catalog.get("Chess Club").unwrap();
        assert_eq!(chess.max_participants, 12);
        assert_eq!(
            chess.participants,
            vec!["michael@mergington.edu", "daniel@mergington.edu"]
        );
        for (_, activity) in catalog.iter() {
            assert_eq!(activity.participants.len(), 2);
        }
    }

    #[test]
    fn test_load_seed_file() {
        let file = write_seed(
            r#"
[activities."Robotics"]
description = "Build robots"
schedule = "Saturdays"
max_participants = 8
participants = ["a@school.edu", "b@school.edu", "a@school.edu"]

[activities."Choir"]
description = "Sing"
schedule = "Mondays"
max_participants = 40
"#,
        );

        let catalog = load_seed_file(file.path()).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Robotics", "Choir"]);
        assert_eq!(
            catalog.get("Robotics").unwrap().participants,
            vec!["a@school.edu", "b@school.edu"]
        );
        assert!(catalog.get("Choir").unwrap().participants.is_empty());
    }

    #[test]
    fn test_load_seed_file_errors() {
        let missing = load_seed_file(Path::new("/nonexistent/seed.toml"));
        assert!(matches!(missing, Err(SeedError::Io { .. })));

        let broken = write_seed("[activities.\"Chess\"]\nmax_participants = \"many\"\n");
        assert!(matches!(load_seed_file(broken.path()), Err(SeedError::Parse { .. })));

        let empty = write_seed("# nothing here\n");
        assert!(matches!(load_seed_file(empty.path()), Err(SeedError::Empty(_))));
    }

    #[test]
    fn test_load_catalog_default() {
        assert_eq!(load_catalog(None).unwrap(), default_catalog());
    }
}
