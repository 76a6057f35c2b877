use tracing::debug;

use crate::merge::basics::select_basics;
use crate::merge::config::{MergeConfig, Section};
use crate::merge::sections::merge_sections;
use crate::merge::skills::merge_skills;
use crate::merge::work::merge_work_history;
use crate::models::resume::{FromFields, MasterRecord, SourceRecord};

/// Reduces any number of source records into one master record.
///
/// Pure: the inputs are only read, and the same inputs always give the same output.
/// Every top-level section is present in the result even when no source supplied it.
pub fn merge_all(records: &[SourceRecord], config: &MergeConfig) -> MasterRecord {
    let work = merge_work_history(records.iter().flat_map(|r| r.section("work")), config);
    let skills = merge_skills(
        records.iter().map(|r| r.section("skills")),
        config.dedupe_threshold,
    );

    let master = MasterRecord {
        basics: select_basics(records, config),
        work,
        volunteer: merge_section_as(records, Section::Volunteer, config),
        education: merge_section_as(records, Section::Education, config),
        awards: merge_section_as(records, Section::Awards, config),
        certificates: merge_section_as(records, Section::Certificates, config),
        publications: merge_section_as(records, Section::Publications, config),
        skills,
        languages: merge_section_as(records, Section::Languages, config),
        interests: merge_section_as(records, Section::Interests, config),
        references: merge_section_as(records, Section::References, config),
        projects: merge_section_as(records, Section::Projects, config),
    };

    debug!(
        sources = records.len(),
        work = master.work.len(),
        education = master.education.len(),
        skills = master.skills.len(),
        projects = master.projects.len(),
        "Merged source records"
    );

    master
}

fn merge_section_as<T: FromFields>(
    records: &[SourceRecord],
    section: Section,
    config: &MergeConfig,
) -> Vec<T> {
    let lists = records.iter().map(|r| r.section(section.field_name()));
    merge_sections(lists, config.key_fields(section), config.dedupe_threshold)
        .iter()
        .map(T::from_fields)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<SourceRecord> {
        values
            .into_iter()
            .filter_map(SourceRecord::from_value)
            .collect()
    }

    fn sample() -> Vec<SourceRecord> {
        records(vec![
            json!({
                "basics": {"name": "Ada Lovelace", "email": "ada@example.com",
                           "profiles": [{"network": "GitHub", "username": "ada"}]},
                "work": [{"name": "Acme", "position": "Engineer", "startDate": "2019",
                          "endDate": "2020-06", "highlights": ["Built X"]}],
                "education": [{"institution": "MIT", "area": "CS", "studyType": "BSc",
                               "startDate": "2012", "endDate": "2016", "courses": ["Algorithms"]}],
                "skills": [{"name": "Python", "level": "beginner", "keywords": ["pandas"]}],
                "languages": [{"language": "English", "fluency": "Native"}],
                "projects": [{"name": "Engine", "startDate": "2018", "highlights": [{"text": "Wrote a VM"}]}]
            }),
            json!({
                "basics": {"name": "Ada", "label": "Engineer", "email": "ada@example.com",
                           "phone": "555-0100"},
                "work": [
                    {"name": "Acme", "position": "Engineer", "startDate": "2020-01-01",
                     "endDate": "2021", "highlights": ["built x "]},
                    {"name": "Globex", "position": "Intern", "startDate": "2016-06", "endDate": "2016-09"}
                ],
                "education": [{"institution": "mit", "area": "cs", "studyType": "bsc",
                               "startDate": "2012-01-01", "endDate": "2016", "score": "4.0",
                               "courses": ["algorithms", "Compilers"]}],
                "skills": [{"name": "python", "level": "expert", "keywords": ["NumPy"]}],
                "languages": [{"language": "english", "fluency": "native"}],
                "projects": [{"name": "Engine", "startDate": "2018-01", "highlights": ["wrote a vm", "Added a JIT"]}]
            }),
        ])
    }

    #[test]
    fn test_end_to_end_merge() {
        let master = merge_all(&sample(), &MergeConfig::default());

        assert_eq!(master.basics.name, "Ada");
        assert_eq!(master.basics.phone, "555-0100");
        assert_eq!(master.basics.profiles.len(), 1);

        assert_eq!(master.work.len(), 2);
        assert_eq!(master.work[0].name, "Acme");
        assert_eq!(master.work[0].start_date, "2019-01-01");
        assert_eq!(master.work[0].end_date, "2021-01-01");
        assert_eq!(master.work[0].highlights, vec!["Built X"]);
        assert_eq!(master.work[1].name, "Globex");
        assert_eq!(master.work[1].start_date, "2016-06-01");

        assert_eq!(master.education.len(), 1);
        assert_eq!(master.education[0].score, "4.0");
        assert_eq!(master.education[0].courses, vec!["Algorithms", "Compilers"]);

        assert_eq!(master.skills.len(), 1);
        assert_eq!(master.skills[0].level, "expert");
        assert_eq!(master.skills[0].keywords, vec!["pandas", "NumPy"]);

        assert_eq!(master.languages.len(), 1);
        assert_eq!(master.projects.len(), 1);
        assert_eq!(master.projects[0].start_date, "2018-01-01");
        assert_eq!(master.projects[0].highlights, vec!["Wrote a VM", "Added a JIT"]);
    }

    #[test]
    fn test_empty_input_has_every_section() {
        let master = merge_all(&[], &MergeConfig::default());
        assert_eq!(master, MasterRecord::default());
        let value = serde_json::to_value(&master).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "basics", "work", "volunteer", "education", "awards", "certificates",
                "publications", "skills", "languages", "interests", "references", "projects"
            ]
        );
    }

    #[test]
    fn test_merging_master_with_itself_is_stable() {
        let config = MergeConfig::default();
        let master = merge_all(&sample(), &config);
        let as_source = SourceRecord::from_value(serde_json::to_value(&master).unwrap()).unwrap();
        let again = merge_all(&[as_source.clone(), as_source], &config);
        assert_eq!(master, again);
    }

    #[test]
    fn test_custom_section_keys() {
        let mut config = MergeConfig::default();
        config
            .section_keys
            .insert(Section::Awards, vec!["title".to_string()]);
        let input = records(vec![
            json!({"awards": [{"title": "Dean's List", "date": "2014"}]}),
            json!({"awards": [{"title": "Dean's List", "date": "2015"}]}),
        ]);
        assert_eq!(merge_all(&input, &config).awards.len(), 1);
        assert_eq!(merge_all(&input, &MergeConfig::default()).awards.len(), 2);
    }

    #[test]
    fn test_source_order_permutation() {
        let config = MergeConfig::default();
        let mut reversed = sample();
        reversed.reverse();
        let forward = merge_all(&sample(), &config);
        let backward = merge_all(&reversed, &config);
        assert_eq!(forward.work.len(), backward.work.len());
        for (f, b) in forward.work.iter().zip(backward.work.iter()) {
            assert_eq!((&f.start_date, &f.end_date), (&b.start_date, &b.end_date));
        }
        assert_eq!(forward.skills[0].level, backward.skills[0].level);
        assert_eq!(forward.basics.name, backward.basics.name);
    }
}
