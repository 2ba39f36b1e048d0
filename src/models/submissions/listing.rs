//! 三种列表记录与列表引擎的对接

use super::entities::{Submission, SubmissionStatus};
use super::responses::{AdminSubmissionItem, ShowcaseProject};
use crate::listing::{Listable, SearchField, SortKey, define_sort_fields};

define_sort_fields! {
    /// 公开展示页可排序列
    ShowcaseSortField, "../frontend/src/types/generated/listing.ts" {
        ProjectName => "project_name",
        GroupClass => "group_class",
        Course => "course",
        Lecturer => "lecturer",
        ClassName => "class_name",
        ProgramStudy => "program_study",
        BatchYear => "batch_year",
        Status => "status",
        Members => "members",
    }
}

define_sort_fields! {
    /// 学生个人列表可排序列
    SubmissionSortField, "../frontend/src/types/generated/listing.ts" {
        ProjectName => "project_name",
        Course => "course",
        Lecturer => "lecturer",
        ProgramStudy => "program_study",
        Status => "status",
        CreatedAt => "created_at",
    }
}

define_sort_fields! {
    /// 管理员审核列表可排序列
    AdminSortField, "../frontend/src/types/generated/listing.ts" {
        ProjectName => "project_name",
        Course => "course",
        Lecturer => "lecturer",
        ProgramStudy => "program_study",
        Status => "status",
        OwnerName => "owner_name",
        CreatedAt => "created_at",
    }
}

impl Listable for ShowcaseProject {
    type Field = ShowcaseSortField;

    fn status(&self) -> SubmissionStatus {
        self.status
    }

    fn category(&self) -> &str {
        &self.program_study
    }

    fn search_fields(&self) -> Vec<SearchField<'_>> {
        vec![
            SearchField::Text(&self.project_name),
            SearchField::Text(&self.group_class),
            SearchField::Text(&self.course),
            SearchField::Text(&self.lecturer),
            SearchField::Many(&self.members),
        ]
    }

    fn sort_key(&self, field: ShowcaseSortField) -> SortKey<'_> {
        match field {
            ShowcaseSortField::ProjectName => SortKey::Text(&self.project_name),
            ShowcaseSortField::GroupClass => SortKey::Text(&self.group_class),
            ShowcaseSortField::Course => SortKey::Text(&self.course),
            ShowcaseSortField::Lecturer => SortKey::Text(&self.lecturer),
            ShowcaseSortField::ClassName => SortKey::Text(&self.class_name),
            ShowcaseSortField::ProgramStudy => SortKey::Text(&self.program_study),
            ShowcaseSortField::BatchYear => self
                .batch_year
                .as_deref()
                .map_or(SortKey::Opaque, SortKey::Text),
            ShowcaseSortField::Status => SortKey::Text(self.status.as_str()),
            ShowcaseSortField::Members => SortKey::Opaque,
        }
    }
}

impl Listable for Submission {
    type Field = SubmissionSortField;

    fn status(&self) -> SubmissionStatus {
        self.status
    }

    fn category(&self) -> &str {
        &self.program_study
    }

    fn search_fields(&self) -> Vec<SearchField<'_>> {
        vec![
            SearchField::Text(&self.project_name),
            SearchField::Text(&self.course),
            SearchField::Text(&self.lecturer),
            SearchField::Text(&self.group_class),
        ]
    }

    fn sort_key(&self, field: SubmissionSortField) -> SortKey<'_> {
        match field {
            SubmissionSortField::ProjectName => SortKey::Text(&self.project_name),
            SubmissionSortField::Course => SortKey::Text(&self.course),
            SubmissionSortField::Lecturer => SortKey::Text(&self.lecturer),
            SubmissionSortField::ProgramStudy => SortKey::Text(&self.program_study),
            SubmissionSortField::Status => SortKey::Text(self.status.as_str()),
            SubmissionSortField::CreatedAt => SortKey::Opaque,
        }
    }
}

impl Listable for AdminSubmissionItem {
    type Field = AdminSortField;

    fn status(&self) -> SubmissionStatus {
        self.submission.status
    }

    fn category(&self) -> &str {
        &self.submission.program_study
    }

    fn search_fields(&self) -> Vec<SearchField<'_>> {
        vec![
            SearchField::Text(&self.submission.project_name),
            SearchField::Text(&self.submission.course),
            SearchField::Text(&self.submission.lecturer),
            SearchField::Text(&self.owner_name),
        ]
    }

    fn sort_key(&self, field: AdminSortField) -> SortKey<'_> {
        let s = &self.submission;
        match field {
            AdminSortField::ProjectName => SortKey::Text(&s.project_name),
            AdminSortField::Course => SortKey::Text(&s.course),
            AdminSortField::Lecturer => SortKey::Text(&s.lecturer),
            AdminSortField::ProgramStudy => SortKey::Text(&s.program_study),
            AdminSortField::Status => SortKey::Text(s.status.as_str()),
            AdminSortField::OwnerName => SortKey::Text(&self.owner_name),
            AdminSortField::CreatedAt => SortKey::Opaque,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{ListingCriteria, SortField, SortState, apply};

    fn submission(id: i64, name: &str, course: &str) -> Submission {
        let now = chrono::Utc::now();
        Submission {
            id,
            user_id: 10,
            project_name: name.to_string(),
            class_name: "SI-2B".to_string(),
            group_class: "Kelompok 4".to_string(),
            course: course.to_string(),
            lecturer: "Ir. Hendra".to_string(),
            grade: None,
            program_study: "Sistem Informasi".to_string(),
            members: vec!["Maya Putri".to_string()],
            document_token: None,
            document_url: None,
            status: SubmissionStatus::Pending,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sort_field_names_round_trip() {
        for field in ShowcaseSortField::all() {
            assert_eq!(field.as_str().parse::<ShowcaseSortField>(), Ok(*field));
        }
        for field in AdminSortField::all() {
            assert_eq!(field.as_str().parse::<AdminSortField>(), Ok(*field));
        }
        assert!("members".parse::<SubmissionSortField>().is_err());
    }

    #[test]
    fn test_admin_search_includes_owner_name() {
        let items = vec![
            AdminSubmissionItem {
                submission: submission(1, "Smart Campus", "IoT"),
                owner_name: "Rizky Pratama".to_string(),
                owner_username: "2201001".to_string(),
            },
            AdminSubmissionItem {
                submission: submission(2, "Kasir Online", "Basis Data"),
                owner_name: "Dewi Lestari".to_string(),
                owner_username: "2201002".to_string(),
            },
        ];
        let criteria = ListingCriteria::new(SortState::ascending(AdminSortField::CreatedAt))
            .with_search("DEWI");
        let result = apply(&items, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].submission.id, 2);
    }

    #[test]
    fn test_student_list_does_not_search_members() {
        let records = vec![submission(1, "Smart Campus", "IoT")];
        let criteria = ListingCriteria::new(SortState::ascending(SubmissionSortField::CreatedAt))
            .with_search("maya");
        assert!(apply(&records, &criteria).is_empty());
    }
}
