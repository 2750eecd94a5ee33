use std::sync::Arc;

use dioxus::prelude::*;
use rfd::FileDialog;

use crate::domain::entities::criteria::{normalize_category, STATUS_ALL};
use crate::domain::entities::record::JsonRecord;
use crate::domain::entities::view_config::AggregateDef;
use crate::domain::entities::view_model::AggregateResult;
use crate::infra::config::settings::AppSettings;
use crate::infra::http::client::HttpRecordSource;
use crate::ui::state::app_state::AppState;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::fetch_service::FetchService;
use crate::usecase::services::report_session::ReportSession;
use crate::{
    default_export_dir, distinct_raw_values, distinct_values, format_cell, format_date_input, format_metric,
    metric_label, page_size_options, parse_date_input, sort_indicator, table_body_cell_style,
    table_container_style, table_header_cell_style,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DropdownId {
    View,
    Status,
    PageSize,
}

#[derive(Clone, Debug, PartialEq)]
struct DropdownOption {
    value: String,
    label: String,
}

impl DropdownOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value, as for page sizes.
    fn plain(value: impl ToString) -> Self {
        let value = value.to_string();
        Self::new(value.clone(), value)
    }
}

/// Label of the selected option; an unlisted selection shows its raw value.
fn selected_option_label(options: &[DropdownOption], selected: &str) -> String {
    options
        .iter()
        .find(|opt| opt.value == selected)
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| selected.to_string())
}

#[component]
fn DropdownSelect(
    id: DropdownId,
    label: &'static str,
    options: Vec<DropdownOption>,
    selected: String,
    disabled: bool,
    mut open_dropdown: Signal<Option<DropdownId>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id) && !disabled;
    let button_text = selected_option_label(&options, &selected);
    let (left, top) = dropdown_pos().unwrap_or_default();
    let cursor = if disabled { "default" } else { "pointer" };

    rsx! {
        span {
            style: "display: inline-flex; align-items: center; gap: 6px;",
            "{label}"
            button {
                style: "min-width: 90px; text-align: left; border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: {cursor};",
                disabled,
                onclick: move |event| {
                    event.stop_propagation();
                    if is_open {
                        open_dropdown.set(None);
                    } else {
                        let anchor = event.client_coordinates();
                        dropdown_pos.set(Some((anchor.x, anchor.y + 24.0)));
                        open_dropdown.set(Some(id));
                    }
                },
                "{button_text} ▾"
            }
        }

        if is_open {
            ul {
                style: "list-style: none; margin: 0; padding: 4px 0; position: fixed; left: {left}px; top: {top}px; min-width: 160px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                onclick: move |event| event.stop_propagation(),
                {options.iter().map(|opt| {
                    let value = opt.value.clone();
                    let weight = if opt.value == selected { "600" } else { "400" };
                    let background = if opt.value == selected { "#eef4ff" } else { "transparent" };
                    rsx!(
                        li {
                            key: "{opt.value}",
                            style: "padding: 6px 12px; cursor: pointer; background: {background}; font-weight: {weight};",
                            onclick: move |_| {
                                open_dropdown.set(None);
                                on_select.call(value.clone());
                            },
                            "{opt.label}"
                        }
                    )
                })}
            }
        }
    }
}

#[component]
fn SummaryCards(aggregates: Vec<AggregateDef>, summary: AggregateResult) -> Element {
    rsx! {
        div { style: "display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 12px;",
            {aggregates.iter().map(|def| {
                let name = def.name().to_string();
                let title = metric_label(&name);
                let body = match def {
                    AggregateDef::CountBy { .. } => summary
                        .group(&name)
                        .map(|groups| {
                            groups
                                .iter()
                                .map(|(group, count)| format!("{group}: {count}"))
                                .collect::<Vec<_>>()
                                .join(" · ")
                        })
                        .filter(|text| !text.is_empty())
                        .unwrap_or_else(|| "-".to_string()),
                    _ => format_metric(&name, summary.metric(&name)),
                };
                rsx!(
                    div {
                        key: "{name}",
                        style: "min-width: 140px; padding: 10px 14px; border: 1px solid #ddd; border-radius: 8px; background: #fafafa;",
                        div { style: "font-size: 12px; color: #666;", "{title}" }
                        div { style: "font-size: 18px; font-weight: 600;", "{body}" }
                    }
                )
            })}
        }
    }
}

/// Fetches the session's view off the UI thread and applies the result if
/// its ticket is still current. Responses for a replaced or closed session
/// are dropped without touching the signals.
async fn refresh_session(
    service: Arc<FetchService>,
    mut session: Signal<ReportSession<JsonRecord>>,
    mut busy: Signal<bool>,
    mut status: Signal<String>,
) {
    let (ticket, guard, config) = {
        let mut current = session.write();
        (current.begin_fetch(), current.guard(), current.config().clone())
    };
    let title = config.title.clone();
    *busy.write() = true;
    *status.write() = format!("Loading {title}…");

    let Some(result) = service.fetch_in_background(config, guard, ticket).await else {
        return;
    };

    let message = {
        let mut current = session.write();
        if !current.complete_fetch(ticket, result) {
            return;
        }
        let message = match current.load_state().error() {
            Some(err) => format!("Failed to load {title}: {err}"),
            None => format!("Loaded {} records", current.records().len()),
        };
        message
    };
    *status.write() = message;
    *busy.write() = false;
}

#[component]
pub fn App() -> Element {
    let settings = use_hook(AppSettings::from_environment);

    let AppState {
        views,
        mut selected_view,
        mut session,
        mut search_input,
        busy,
        mut status,
    } = AppState::new(settings.view_configs());

    let fetch_service = use_hook(|| {
        let source = Arc::new(HttpRecordSource::from_settings(&settings));
        Arc::new(FetchService::new(source, settings.api_token.clone()))
    });
    let mut open_dropdown = use_signal(|| None::<DropdownId>);
    let dropdown_pos = use_signal(|| None::<(f64, f64)>);

    let service_for_init = fetch_service.clone();
    use_effect(move || {
        spawn(refresh_session(service_for_init.clone(), session, busy, status));
    });

    use_drop(move || {
        if let Ok(mut current) = session.try_write() {
            current.close();
        }
    });

    let service_for_view = fetch_service.clone();
    let service_for_retry = fetch_service.clone();
    let service_for_refresh = fetch_service.clone();
    let settings_for_export = settings.clone();

    let current = session.read();
    let config = current.config().clone();
    let criteria = current.criteria().clone();
    let sort = current.sort().cloned();
    let load_state = current.load_state().clone();
    let view_model = current.view_model();
    let status_values = config
        .status_field
        .as_deref()
        .map(|field| distinct_raw_values(current.records(), field))
        .unwrap_or_default();
    let category_values = config
        .category_fields
        .iter()
        .map(|field| (field.clone(), distinct_values(current.records(), field)))
        .filter(|(_, values)| !values.is_empty())
        .collect::<Vec<_>>();
    drop(current);

    let view_options = views()
        .iter()
        .map(|view| DropdownOption::new(view.key.as_str(), view.title.as_str()))
        .collect::<Vec<_>>();
    let status_options = std::iter::once(DropdownOption::new(STATUS_ALL, "All"))
        .chain(
            status_values
                .iter()
                .map(|value| DropdownOption::new(value.as_str(), value.trim())),
        )
        .collect::<Vec<_>>();
    let page_options = page_size_options(view_model.page.items_per_page)
        .into_iter()
        .map(DropdownOption::plain)
        .collect::<Vec<_>>();

    let selected_status = criteria
        .active_status()
        .map(str::to_string)
        .unwrap_or_else(|| STATUS_ALL.to_string());
    let date_range = criteria.date_range.unwrap_or_default();
    let date_from = format_date_input(date_range.from);
    let date_to = format_date_input(date_range.to);
    let selected_categories = criteria.category_filters.clone();
    let range_text = match view_model.visible_range() {
        Some((start, end)) => format!("{start}-{end} of {}", view_model.total_filtered),
        None => format!("0 of {}", view_model.total_filtered),
    };
    let page_text = format!(
        "Page {} of {}",
        view_model.page.current_page, view_model.total_pages
    );
    let error_message = load_state.error().map(str::to_string);
    let show_loading = load_state.is_loading() && view_model.total_unfiltered == 0;
    let show_empty = view_model.is_empty() && !show_loading && error_message.is_none();
    let fields = config.fields.clone();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 16px;",
            onclick: move |_| open_dropdown.set(None),

            div { style: "display: flex; align-items: center; gap: 12px; margin-bottom: 12px;",
                h2 { style: "margin: 0;", "{config.title}" }
                DropdownSelect {
                    id: DropdownId::View,
                    label: "Report",
                    options: view_options,
                    selected: selected_view(),
                    disabled: busy(),
                    open_dropdown,
                    dropdown_pos,
                    on_select: move |key: String| {
                        if key == selected_view() {
                            return;
                        }
                        let Some(next) = views.peek().iter().find(|view| view.key == key).cloned() else {
                            return;
                        };
                        session.write().close();
                        session.set(ReportSession::new(next));
                        search_input.set(String::new());
                        selected_view.set(key);
                        spawn(refresh_session(service_for_view.clone(), session, busy, status));
                    },
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        spawn(refresh_session(service_for_refresh.clone(), session, busy, status));
                    },
                    "Refresh"
                }
                button {
                    disabled: busy() || view_model.is_empty(),
                    onclick: move |_| {
                        let mut dialog = FileDialog::new();
                        if let Ok(dir) = default_export_dir(&settings_for_export) {
                            dialog = dialog.set_directory(dir);
                        }
                        let Some(dir) = dialog.pick_folder() else {
                            return;
                        };
                        let exporter = ExportService::new(dir);
                        let result = exporter.export_session(&*session.read());
                        match result {
                            Ok(path) => {
                                *status.write() = format!("Exported to {}", path.display());
                            }
                            Err(err) => {
                                log::error!("export failed: {err:#}");
                                *status.write() = format!("Export failed: {err:#}");
                            }
                        }
                    },
                    "Export CSV"
                }
            }

            if let Some(message) = error_message {
                div {
                    style: "display: flex; align-items: center; gap: 12px; padding: 8px 12px; margin-bottom: 12px; background: #fdecea; border: 1px solid #f5c2c0; border-radius: 6px; color: #8a1c1c;",
                    span { "{message}" }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            spawn(refresh_session(service_for_retry.clone(), session, busy, status));
                        },
                        "Retry"
                    }
                }
            }

            div { style: "display: flex; flex-wrap: wrap; align-items: center; gap: 12px; margin-bottom: 12px;",
                input {
                    r#type: "search",
                    placeholder: "Search",
                    value: "{search_input}",
                    oninput: move |event| search_input.set(event.value()),
                    onkeydown: move |event| {
                        if event.key() == Key::Enter {
                            session.write().set_search_text(search_input());
                        }
                    },
                }
                button {
                    onclick: move |_| session.write().set_search_text(search_input()),
                    "Search"
                }
                if config.status_field.is_some() {
                    DropdownSelect {
                        id: DropdownId::Status,
                        label: "Status",
                        options: status_options,
                        selected: selected_status,
                        disabled: false,
                        open_dropdown,
                        dropdown_pos,
                        on_select: move |value: String| session.write().set_status_filter(value),
                    }
                }
                label { "From" }
                input {
                    r#type: "date",
                    value: "{date_from}",
                    onchange: move |event| {
                        let from = parse_date_input(&event.value());
                        let to = session.peek().criteria().date_range.and_then(|range| range.to);
                        session.write().set_date_range(from, to);
                    },
                }
                label { "To" }
                input {
                    r#type: "date",
                    value: "{date_to}",
                    onchange: move |event| {
                        let to = parse_date_input(&event.value());
                        let from = session.peek().criteria().date_range.and_then(|range| range.from);
                        session.write().set_date_range(from, to);
                    },
                }
                button {
                    onclick: move |_| {
                        search_input.set(String::new());
                        session.write().clear_filters();
                    },
                    "Clear filters"
                }
            }

            {category_values.iter().map(|(field, values)| {
                let label = config
                    .field(field)
                    .map(|def| def.label.clone())
                    .unwrap_or_else(|| metric_label(field));
                let selected = selected_categories.get(field).cloned().unwrap_or_default();
                rsx!(
                    div {
                        key: "{field}",
                        style: "display: flex; flex-wrap: wrap; align-items: center; gap: 6px; margin-bottom: 8px;",
                        span { style: "font-size: 12px; color: #666;", "{label}" }
                        {values.iter().map(|value| {
                            let is_selected = selected.contains(&normalize_category(value));
                            let background = if is_selected { "#dbe7ff" } else { "#fff" };
                            let field = field.clone();
                            let value_for_toggle = value.clone();
                            rsx!(
                                button {
                                    key: "{value}",
                                    style: "border: 1px solid #bbb; border-radius: 12px; padding: 2px 10px; background: {background}; cursor: pointer;",
                                    onclick: move |_| {
                                        session.write().toggle_category(&field, &value_for_toggle);
                                    },
                                    "{value}"
                                }
                            )
                        })}
                    }
                )
            })}

            SummaryCards {
                aggregates: config.aggregates.clone(),
                summary: view_model.summary.clone(),
            }

            if show_loading {
                div { style: "padding: 24px; color: #666;", "Loading…" }
            } else if show_empty {
                div { style: "padding: 24px; color: #666;", "No records found" }
            } else {
                div { style: table_container_style(),
                    table { style: "border-collapse: collapse; width: 100%;",
                        thead {
                            tr {
                                {fields.iter().map(|field| {
                                    let key = field.key.clone();
                                    let indicator = sort_indicator(sort.as_ref(), &field.key);
                                    let style = table_header_cell_style(field.kind);
                                    rsx!(
                                        th {
                                            key: "{field.key}",
                                            style: "{style}",
                                            onclick: move |_| session.write().toggle_sort(&key),
                                            "{field.label}{indicator}"
                                        }
                                    )
                                })}
                            }
                        }
                        tbody {
                            {view_model.visible_records.iter().enumerate().map(|(row_idx, record)| {
                                rsx!(
                                    tr { key: "{row_idx}",
                                        {fields.iter().map(|field| {
                                            let text = format_cell(record, &field.key, field.kind);
                                            let style = table_body_cell_style(field.kind);
                                            rsx!(td { style: "{style}", "{text}" })
                                        })}
                                    }
                                )
                            })}
                        }
                    }
                }
            }

            div { style: "display: flex; align-items: center; gap: 12px; margin-top: 12px;",
                button {
                    disabled: !view_model.has_previous_page(),
                    onclick: move |_| session.write().previous_page(),
                    "Previous"
                }
                span { "{page_text}" }
                button {
                    disabled: !view_model.has_next_page(),
                    onclick: move |_| session.write().next_page(),
                    "Next"
                }
                span { style: "color: #666;", "{range_text}" }
                DropdownSelect {
                    id: DropdownId::PageSize,
                    label: "Rows per page",
                    options: page_options,
                    selected: view_model.page.items_per_page.to_string(),
                    disabled: false,
                    open_dropdown,
                    dropdown_pos,
                    on_select: move |value: String| {
                        if let Ok(size) = value.parse::<usize>() {
                            session.write().set_items_per_page(size);
                        }
                    },
                }
            }

            div { style: "margin-top: 12px; font-size: 12px; color: #666;", "{status}" }
        }
    }
}

#[cfg(test)]
mod dropdown_tests {
    use super::*;

    #[test]
    fn selected_label_comes_from_matching_option() {
        let options = vec![DropdownOption::new("all", "All"), DropdownOption::plain(25)];
        assert_eq!(selected_option_label(&options, "all"), "All");
        assert_eq!(selected_option_label(&options, "25"), "25");
        assert_eq!(selected_option_label(&options, "archived"), "archived");
    }
}
