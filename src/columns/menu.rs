//! Column header menu model.
//!
//! The menu is built from column state and returns actions; applying them is
//! left to the orchestrator, which owns the engines they touch.

use serde::{Deserialize, Serialize};

use crate::types::{ColumnState, SortDirection};

/// Something the user can pick from a column menu.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "field", rename_all = "camelCase")]
pub enum MenuAction {
    SortAsc(String),
    SortDesc(String),
    ClearSort(String),
    HideColumn(String),
    ToggleColumn(String),
}

/// One row of a column menu.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MenuItem {
    Action {
        action: MenuAction,
        label: String,
        checked: bool,
        disabled: bool,
    },
    Separator,
}

impl MenuItem {
    fn action(action: MenuAction, label: impl Into<String>, checked: bool, disabled: bool) -> Self {
        Self::Action {
            action,
            label: label.into(),
            checked,
            disabled,
        }
    }

    pub fn menu_action(&self) -> Option<&MenuAction> {
        match self {
            Self::Action { action, .. } => Some(action),
            Self::Separator => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Action { disabled: true, .. })
    }
}

pub struct ColumnMenu;

impl ColumnMenu {
    /// Menu for `column`, with a visibility chooser over `all_columns`.
    pub fn items(column: &ColumnState, all_columns: &[ColumnState]) -> Vec<MenuItem> {
        let field = column.field().to_string();
        let mut items = Vec::new();

        if column.def.sortable {
            items.push(MenuItem::action(
                MenuAction::SortAsc(field.clone()),
                "Sort Ascending",
                column.sort_direction == Some(SortDirection::Asc),
                false,
            ));
            items.push(MenuItem::action(
                MenuAction::SortDesc(field.clone()),
                "Sort Descending",
                column.sort_direction == Some(SortDirection::Desc),
                false,
            ));
            items.push(MenuItem::action(
                MenuAction::ClearSort(field.clone()),
                "Clear Sort",
                false,
                column.sort_direction.is_none(),
            ));
            items.push(MenuItem::Separator);
        }

        items.push(MenuItem::action(
            MenuAction::HideColumn(field),
            "Hide Column",
            false,
            column.def.lock_visible,
        ));

        if !all_columns.is_empty() {
            items.push(MenuItem::Separator);
            items.extend(all_columns.iter().map(|c| {
                MenuItem::action(
                    MenuAction::ToggleColumn(c.field().to_string()),
                    c.def.header(),
                    c.visible,
                    c.def.lock_visible,
                )
            }));
        }
        items
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::columns::ColumnController;
    use crate::types::{ColumnDef, SortItem};

    #[test]
    fn test_sortable_column_menu() {
        let mut controller =
            ColumnController::from_defs(&[ColumnDef::new("a").sortable(), ColumnDef::new("b")]);
        controller.apply_sort_model(&[SortItem::asc("a")]);
        let items = ColumnMenu::items(controller.column("a").unwrap(), controller.columns());

        assert_eq!(
            items[0],
            MenuItem::Action {
                action: MenuAction::SortAsc("a".into()),
                label: "Sort Ascending".into(),
                checked: true,
                disabled: false,
            }
        );
        assert!(!items[2].is_disabled(), "clear sort enabled while sorted");
        // sort asc, sort desc, clear, separator, hide, separator, two toggles
        assert_eq!(items.len(), 8);
    }

    #[test]
    fn test_locked_column_cannot_hide() {
        let mut def = ColumnDef::new("a");
        def.lock_visible = true;
        let controller = ColumnController::from_defs(&[def]);
        let items = ColumnMenu::items(controller.column("a").unwrap(), &[]);
        assert_eq!(items.len(), 1);
        assert!(items[0].is_disabled());
    }
}
