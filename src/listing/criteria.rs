use serde::Deserialize;
use ts_rs::TS;

use super::{SortDirection, SortField, SortState};
use crate::errors::{PortalError, Result};
use crate::models::submissions::entities::SubmissionStatus;

/// 筛选条件，`All` 表示不过滤
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Filter<T> {
    pub fn admits<U>(&self, value: &U) -> bool
    where
        U: ?Sized,
        T: PartialEq<U>,
    {
        match self {
            Filter::All => true,
            Filter::Only(expected) => expected == value,
        }
    }

    /// 解析查询参数，缺省、空串或 `all` 均视为不过滤
    fn parse_with<F>(raw: Option<&str>, parse: F) -> Result<Self>
    where
        F: FnOnce(&str) -> std::result::Result<T, String>,
    {
        match raw.map(str::trim) {
            None | Some("") => Ok(Filter::All),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Filter::All),
            Some(s) => parse(s).map(Filter::Only).map_err(PortalError::validation),
        }
    }
}

/// 一次列表查询的完整条件
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCriteria<F> {
    pub search_term: String,
    pub status_filter: Filter<SubmissionStatus>,
    pub category_filter: Filter<String>,
    pub sort: SortState<F>,
}

impl<F: SortField> ListingCriteria<F> {
    /// 不过滤任何记录的条件
    pub fn new(sort: SortState<F>) -> Self {
        Self {
            search_term: String::new(),
            status_filter: Filter::All,
            category_filter: Filter::All,
            sort,
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status_filter = Filter::Only(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_filter = Filter::Only(category.into());
        self
    }
}

/// 列表查询参数
///
/// `sort` + `direction` 为客户端当前的排序状态，`toggle` 表示本次点击的列，
/// 服务端计算出新的排序状态并在响应中返回。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/listing.ts")]
pub struct ListingParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub program: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
    pub toggle: Option<String>,
}

impl ListingParams {
    pub fn into_criteria<F: SortField>(self, default_sort: SortState<F>) -> Result<ListingCriteria<F>> {
        let status_filter = Filter::parse_with(self.status.as_deref(), |s| {
            s.parse::<SubmissionStatus>()
        })?;
        let category_filter = Filter::parse_with(self.program.as_deref(), |s| Ok(s.to_string()))?;

        let mut sort = match self.sort.as_deref().map(str::trim) {
            Some(field) if !field.is_empty() => SortState::new(
                field.parse::<F>().map_err(PortalError::validation)?,
                self.direction.unwrap_or_default(),
            ),
            _ => SortState {
                direction: self.direction.unwrap_or(default_sort.direction),
                ..default_sort
            },
        };

        if let Some(column) = self.toggle.as_deref().map(str::trim)
            && !column.is_empty()
        {
            sort.toggle(column.parse::<F>().map_err(PortalError::validation)?);
        }

        Ok(ListingCriteria {
            search_term: self.search.unwrap_or_default(),
            status_filter,
            category_filter,
            sort,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::listing::ShowcaseSortField;

    fn default_sort() -> SortState<ShowcaseSortField> {
        SortState::ascending(ShowcaseSortField::ProjectName)
    }

    #[test]
    fn test_empty_params_are_all_pass() {
        let criteria = ListingParams::default()
            .into_criteria(default_sort())
            .unwrap();
        assert_eq!(criteria, ListingCriteria::new(default_sort()));
    }

    #[test]
    fn test_all_keyword_disables_filters() {
        let params = ListingParams {
            status: Some("ALL".into()),
            program: Some("all".into()),
            ..Default::default()
        };
        let criteria = params.into_criteria(default_sort()).unwrap();
        assert_eq!(criteria.status_filter, Filter::All);
        assert_eq!(criteria.category_filter, Filter::All);
    }

    #[test]
    fn test_filters_and_search_are_parsed() {
        let params = ListingParams {
            search: Some("maya".into()),
            status: Some("approved".into()),
            program: Some("Sistem Informasi".into()),
            ..Default::default()
        };
        let criteria = params.into_criteria(default_sort()).unwrap();
        assert_eq!(criteria.search_term, "maya");
        assert_eq!(
            criteria.status_filter,
            Filter::Only(SubmissionStatus::Approved)
        );
        assert_eq!(
            criteria.category_filter,
            Filter::Only("Sistem Informasi".to_string())
        );
    }

    #[test]
    fn test_toggle_applies_to_current_sort() {
        let params = ListingParams {
            sort: Some("lecturer".into()),
            direction: Some(SortDirection::Asc),
            toggle: Some("lecturer".into()),
            ..Default::default()
        };
        let criteria = params.into_criteria(default_sort()).unwrap();
        assert_eq!(
            criteria.sort,
            SortState::descending(ShowcaseSortField::Lecturer)
        );

        let params = ListingParams {
            sort: Some("lecturer".into()),
            direction: Some(SortDirection::Desc),
            toggle: Some("course".into()),
            ..Default::default()
        };
        let criteria = params.into_criteria(default_sort()).unwrap();
        assert_eq!(criteria.sort, SortState::ascending(ShowcaseSortField::Course));
    }

    #[test]
    fn test_direction_without_sort_keeps_default_field() {
        let params = ListingParams {
            direction: Some(SortDirection::Desc),
            ..Default::default()
        };
        let criteria = params.into_criteria(default_sort()).unwrap();
        assert_eq!(
            criteria.sort,
            SortState::descending(ShowcaseSortField::ProjectName)
        );
    }

    #[test]
    fn test_invalid_values_are_validation_errors() {
        let bad_status = ListingParams {
            status: Some("graded".into()),
            ..Default::default()
        };
        let err = bad_status.into_criteria(default_sort()).unwrap_err();
        assert_eq!(err.code(), "E007");

        let bad_sort = ListingParams {
            sort: Some("score".into()),
            ..Default::default()
        };
        assert!(bad_sort.into_criteria(default_sort()).is_err());

        let bad_toggle = ListingParams {
            toggle: Some("score".into()),
            ..Default::default()
        };
        assert!(bad_toggle.into_criteria(default_sort()).is_err());
    }
}
