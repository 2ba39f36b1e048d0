use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::SortField;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/listing.ts")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// 按方向调整升序比较结果
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// 当前排序列与方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> SortState<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn descending(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// 点击列头：同一列翻转方向，换列则从升序开始
    pub fn toggle(&mut self, field: F) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn toggled(mut self, field: F) -> Self {
        self.toggle(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::listing::ShowcaseSortField;

    #[test]
    fn test_toggle_same_field_flips() {
        let state = SortState::ascending(ShowcaseSortField::ProjectName);
        let state = state.toggled(ShowcaseSortField::ProjectName);
        assert_eq!(state.direction, SortDirection::Desc);
        let state = state.toggled(ShowcaseSortField::ProjectName);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_new_field_starts_ascending() {
        let state = SortState::descending(ShowcaseSortField::ProjectName);
        let state = state.toggled(ShowcaseSortField::Lecturer);
        assert_eq!(state.field, ShowcaseSortField::Lecturer);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&SortDirection::Desc).unwrap(),
            "\"desc\""
        );
        assert_eq!(
            serde_json::from_str::<SortDirection>("\"asc\"").unwrap(),
            SortDirection::Asc
        );
    }
}
