use std::cmp::Ordering;

use super::{ListingCriteria, Listable, SearchField, SortDirection, SortKey, SortState};

/// 类似浏览器 `localeCompare` 的比较：先忽略大小写比较，
/// 仅大小写不同时小写在前。
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if primary != Ordering::Equal {
        return primary;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    a.len().cmp(&b.len())
}

/// 文本键之间按方向比较；非文本键不论方向都排在文本键之后，彼此相等
fn compare_keys(a: SortKey<'_>, b: SortKey<'_>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => direction.apply(collate(a, b)),
        (SortKey::Text(_), SortKey::Opaque) => Ordering::Less,
        (SortKey::Opaque, SortKey::Text(_)) => Ordering::Greater,
        (SortKey::Opaque, SortKey::Opaque) => Ordering::Equal,
    }
}

fn compare_records<R: Listable>(a: &R, b: &R, sort: SortState<R::Field>) -> Ordering {
    compare_keys(a.sort_key(sort.field), b.sort_key(sort.field), sort.direction)
}

/// `needle` 需已转为小写
fn matches_search<R: Listable>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |text: &str| text.to_lowercase().contains(needle);
    record.search_fields().into_iter().any(|field| match field {
        SearchField::Text(text) => hit(text),
        SearchField::Many(items) => items.iter().any(|item| hit(item)),
    })
}

fn admits<R: Listable>(record: &R, criteria: &ListingCriteria<R::Field>, needle: &str) -> bool {
    criteria.status_filter.admits(&record.status())
        && criteria.category_filter.admits(record.category())
        && matches_search(record, needle)
}

/// 筛选并排序，返回对输入记录的引用
///
/// 排序是稳定的：键相同（或为非文本键）的记录保持输入顺序，
/// 缺失的文本键（如未填写入学年份）排在最后。
pub fn apply<'a, R: Listable>(records: &'a [R], criteria: &ListingCriteria<R::Field>) -> Vec<&'a R> {
    let needle = criteria.search_term.to_lowercase();
    let mut matched: Vec<&R> = records
        .iter()
        .filter(|record| admits(*record, criteria, &needle))
        .collect();
    matched.sort_by(|a, b| compare_records(*a, *b, criteria.sort));
    matched
}

/// 与 [`apply`] 相同，但接管记录所有权
pub fn apply_owned<R: Listable>(records: Vec<R>, criteria: &ListingCriteria<R::Field>) -> Vec<R> {
    let needle = criteria.search_term.to_lowercase();
    let mut matched: Vec<R> = records
        .into_iter()
        .filter(|record| admits(record, criteria, &needle))
        .collect();
    matched.sort_by(|a, b| compare_records(a, b, criteria.sort));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Filter;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::listing::ShowcaseSortField;
    use crate::models::submissions::responses::ShowcaseProject;
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};

    const PROGRAMS: [&str; 4] = [
        "Teknik Informatika",
        "Sistem Informasi",
        "Teknik Komputer",
        "Multimedia dan Jaringan",
    ];

    fn project(
        id: i64,
        name: &str,
        status: SubmissionStatus,
        program: &str,
        members: &[&str],
    ) -> ShowcaseProject {
        ShowcaseProject {
            id,
            project_name: name.to_string(),
            group_class: format!("Kelompok {id}"),
            members: members.iter().map(|m| m.to_string()).collect(),
            course: "Pemrograman Web".to_string(),
            lecturer: "Dr. Sari".to_string(),
            class_name: "TI-3A".to_string(),
            program_study: program.to_string(),
            batch_year: Some("2022".to_string()),
            status,
            document_url: None,
        }
    }

    fn all_pass() -> ListingCriteria<ShowcaseSortField> {
        ListingCriteria::new(SortState::ascending(ShowcaseSortField::Members))
    }

    fn ids(records: &[&ShowcaseProject]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_collate_is_case_insensitive_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(collate("iot", "IoT"), Ordering::Less);
        assert_eq!(collate("IoT", "iot"), Ordering::Greater);
        assert_eq!(collate("same", "same"), Ordering::Equal);
        assert_eq!(collate("Smart", "Smart Campus"), Ordering::Less);
    }

    #[test]
    fn test_status_filter_scenario() {
        let records = vec![
            project(1, "Smart Campus", SubmissionStatus::Approved, PROGRAMS[0], &[]),
            project(2, "IoT Monitor", SubmissionStatus::Pending, PROGRAMS[0], &[]),
        ];
        let criteria = all_pass().with_status(SubmissionStatus::Approved);
        let result = apply(&records, &criteria);
        assert_eq!(ids(&result), vec![1]);
        assert_eq!(result[0].project_name, "Smart Campus");
    }

    #[test]
    fn test_search_matches_member_names() {
        let records = vec![
            project(1, "Smart Campus", SubmissionStatus::Approved, PROGRAMS[0], &["Budi"]),
            project(
                2,
                "IoT Monitor",
                SubmissionStatus::Pending,
                PROGRAMS[1],
                &["Andi", "Maya Putri"],
            ),
        ];
        let result = apply(&records, &all_pass().with_search("maya"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let records = vec![project(1, "Smart Campus", SubmissionStatus::Approved, PROGRAMS[0], &[])];
        let criteria = all_pass().with_search("tidak ada");
        assert!(apply(&records, &criteria).is_empty());
        assert!(apply::<ShowcaseProject>(&[], &all_pass()).is_empty());
    }

    #[test]
    fn test_opaque_sort_keeps_filtered_order() {
        let records = vec![
            project(3, "c", SubmissionStatus::Pending, PROGRAMS[0], &["z"]),
            project(1, "a", SubmissionStatus::Pending, PROGRAMS[0], &["a"]),
            project(2, "b", SubmissionStatus::Pending, PROGRAMS[0], &["m"]),
        ];
        let asc = all_pass();
        let mut desc = all_pass();
        desc.sort.direction = SortDirection::Desc;
        assert_eq!(ids(&apply(&records, &asc)), vec![3, 1, 2]);
        assert_eq!(ids(&apply(&records, &desc)), vec![3, 1, 2]);
    }

    #[test]
    fn test_text_sort_orders_by_collation() {
        let records = vec![
            project(1, "beta", SubmissionStatus::Pending, PROGRAMS[0], &[]),
            project(2, "Alpha", SubmissionStatus::Pending, PROGRAMS[0], &[]),
            project(3, "alpha", SubmissionStatus::Pending, PROGRAMS[0], &[]),
        ];
        let criteria =
            ListingCriteria::new(SortState::ascending(ShowcaseSortField::ProjectName));
        assert_eq!(ids(&apply(&records, &criteria)), vec![3, 2, 1]);
    }

    #[test]
    fn test_apply_owned_matches_borrowed() {
        let records = vec![
            project(1, "Smart Campus", SubmissionStatus::Approved, PROGRAMS[1], &[]),
            project(2, "IoT Monitor", SubmissionStatus::Pending, PROGRAMS[0], &[]),
            project(3, "Akademik", SubmissionStatus::Approved, PROGRAMS[1], &[]),
        ];
        let criteria = ListingCriteria::new(SortState::ascending(ShowcaseSortField::ProjectName))
            .with_category(PROGRAMS[1]);
        let borrowed = ids(&apply(&records, &criteria));
        let owned: Vec<i64> = apply_owned(records, &criteria)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(borrowed, owned);
        assert_eq!(owned, vec![3, 1]);
    }

    // 随机生成数据，与朴素实现对照

    const WORDS: [&str; 8] = [
        "smart", "Campus", "IoT", "monitor", "Sistem", "parkir", "Absensi", "cerdas",
    ];
    const NAMES: [&str; 6] = ["Maya Putri", "Budi", "andi", "Sari", "Rizky", "Dewi"];

    fn random_records(rng: &mut StdRng, count: usize) -> Vec<ShowcaseProject> {
        (0..count)
            .map(|i| {
                let name = format!(
                    "{} {} {}",
                    WORDS.choose(rng).unwrap(),
                    WORDS.choose(rng).unwrap(),
                    i
                );
                let status = *SubmissionStatus::all().choose(rng).unwrap();
                let program = *PROGRAMS.choose(rng).unwrap();
                let member_count = rng.random_range(0..3);
                let members: Vec<&str> = (0..member_count)
                    .map(|_| *NAMES.choose(rng).unwrap())
                    .collect();
                project(i as i64, &name, status, program, &members)
            })
            .collect()
    }

    fn random_criteria(rng: &mut StdRng) -> ListingCriteria<ShowcaseSortField> {
        let field = *ShowcaseSortField::all().choose(rng).unwrap();
        let direction = if rng.random_bool(0.5) {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        let mut criteria = ListingCriteria::new(SortState::new(field, direction));
        if rng.random_bool(0.5) {
            criteria = criteria.with_status(*SubmissionStatus::all().choose(rng).unwrap());
        }
        if rng.random_bool(0.5) {
            criteria = criteria.with_category(*PROGRAMS.choose(rng).unwrap());
        }
        if rng.random_bool(0.6) {
            let source = if rng.random_bool(0.5) {
                WORDS.choose(rng).unwrap()
            } else {
                NAMES.choose(rng).unwrap()
            };
            let start = rng.random_range(0..source.len().saturating_sub(2).max(1));
            criteria = criteria.with_search(source[start..start + 2].to_uppercase());
        }
        criteria
    }

    fn naive_admits(record: &ShowcaseProject, criteria: &ListingCriteria<ShowcaseSortField>) -> bool {
        let status_ok = match &criteria.status_filter {
            Filter::All => true,
            Filter::Only(s) => record.status == *s,
        };
        let program_ok = match &criteria.category_filter {
            Filter::All => true,
            Filter::Only(p) => &record.program_study == p,
        };
        let term = criteria.search_term.to_lowercase();
        let search_ok = term.is_empty()
            || [
                &record.project_name,
                &record.group_class,
                &record.course,
                &record.lecturer,
            ]
            .iter()
            .any(|f| f.to_lowercase().contains(&term))
            || record.members.iter().any(|m| m.to_lowercase().contains(&term));
        status_ok && program_ok && search_ok
    }

    #[test]
    fn test_all_pass_criteria_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let count = rng.random_range(0..20);
            let records = random_records(&mut rng, count);
            let result = apply(&records, &all_pass());
            assert_eq!(ids(&result), records.iter().map(|r| r.id).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_membership_matches_naive_filter() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..300 {
            let count = rng.random_range(0..25);
            let records = random_records(&mut rng, count);
            let criteria = random_criteria(&mut rng);

            let mut got = ids(&apply(&records, &criteria));
            let mut expected: Vec<i64> = records
                .iter()
                .filter(|r| naive_admits(r, &criteria))
                .map(|r| r.id)
                .collect();
            got.sort_unstable();
            expected.sort_unstable();
            assert_eq!(got, expected, "criteria: {criteria:?}");
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..100 {
            let count = rng.random_range(0..25);
            let records = random_records(&mut rng, count);
            let criteria = random_criteria(&mut rng);

            let once: Vec<ShowcaseProject> =
                apply(&records, &criteria).into_iter().cloned().collect();
            let twice = apply(&once, &criteria);
            assert_eq!(
                ids(&twice),
                once.iter().map(|r| r.id).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_toggle_reverses_distinct_keys() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let count = rng.random_range(1..20);
            // random_records 的项目名带序号，彼此不同
            let records = random_records(&mut rng, count);
            let asc = ListingCriteria::new(SortState::ascending(ShowcaseSortField::ProjectName));
            let mut desc = asc.clone();
            desc.sort.toggle(ShowcaseSortField::ProjectName);
            assert_eq!(desc.sort.direction, SortDirection::Desc);

            let mut forward = ids(&apply(&records, &asc));
            let backward = ids(&apply(&records, &desc));
            forward.reverse();
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn test_missing_batch_year_sorts_last_in_both_directions() {
        let mut records = vec![
            project(1, "a", SubmissionStatus::Pending, PROGRAMS[0], &[]),
            project(2, "b", SubmissionStatus::Pending, PROGRAMS[0], &[]),
            project(3, "c", SubmissionStatus::Pending, PROGRAMS[0], &[]),
            project(4, "d", SubmissionStatus::Pending, PROGRAMS[0], &[]),
        ];
        records[0].batch_year = None;
        records[1].batch_year = Some("2021".to_string());
        records[2].batch_year = None;
        records[3].batch_year = Some("2019".to_string());

        let asc = ListingCriteria::new(SortState::ascending(ShowcaseSortField::BatchYear));
        let desc = ListingCriteria::new(SortState::descending(ShowcaseSortField::BatchYear));
        assert_eq!(ids(&apply(&records, &asc)), vec![4, 2, 1, 3]);
        assert_eq!(ids(&apply(&records, &desc)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_mixed_batch_years_sort_every_field() {
        const YEARS: [&str; 5] = ["2019", "2020", "2021", "2022", "2023"];
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..200 {
            let count = rng.random_range(0..40);
            let mut records = random_records(&mut rng, count);
            for record in &mut records {
                record.batch_year = if rng.random_bool(0.2) {
                    None
                } else {
                    YEARS.choose(&mut rng).map(|y| y.to_string())
                };
            }

            for field in ShowcaseSortField::all() {
                for direction in [SortDirection::Asc, SortDirection::Desc] {
                    let criteria = ListingCriteria::new(SortState::new(*field, direction));
                    let sorted = apply(&records, &criteria);
                    assert_eq!(sorted.len(), records.len());

                    if *field != ShowcaseSortField::BatchYear {
                        continue;
                    }
                    let present = sorted.iter().take_while(|r| r.batch_year.is_some()).count();
                    assert!(sorted[present..].iter().all(|r| r.batch_year.is_none()));
                    for pair in sorted[..present].windows(2) {
                        let (a, b) = (
                            pair[0].batch_year.as_deref().unwrap_or_default(),
                            pair[1].batch_year.as_deref().unwrap_or_default(),
                        );
                        assert_ne!(direction.apply(collate(a, b)), Ordering::Greater);
                    }
                }
            }
        }
    }
}
