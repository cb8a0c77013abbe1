pub(super) mod comparison;
pub(super) mod detail;
pub(super) mod sidebar;
pub(super) mod table;

pub(in crate::tui_shell) use comparison::ComparisonPane;
pub(in crate::tui_shell) use detail::DetailPane;
pub(in crate::tui_shell) use sidebar::TagSidebar;
pub(in crate::tui_shell) use table::TablePane;
