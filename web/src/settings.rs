use numbuster_core::LevelConfig;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

pub(crate) type Field = (String, String);

const SIDE_OPTIONS: &[&str] = &["3", "4", "5", "6", "7"];
const INTERVAL_OPTIONS: &[&str] = &["500", "1000", "1500", "2000"];
const PROBABILITY_OPTIONS: &[&str] = &["25", "50", "75", "100"];

/// Form fields describing `config`, in the shape [`LevelConfig::from_fields`] reads back.
pub(crate) fn config_fields(config: &LevelConfig) -> Vec<Field> {
    vec![
        ("side".to_string(), config.side().to_string()),
        ("interval".to_string(), config.interval_ms().to_string()),
        ("probability".to_string(), config.probability_pct().to_string()),
    ]
}

pub(crate) fn set_field(fields: &mut Vec<Field>, name: String, value: String) {
    match fields.iter().position(|(field, _)| *field == name) {
        Some(index) => fields[index].1 = value,
        None => fields.push((name, value)),
    }
}

pub(crate) fn parse_fields(fields: &[Field]) -> numbuster_core::Result<LevelConfig> {
    LevelConfig::from_fields(
        fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    )
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub fields: Vec<Field>,
    pub onchange: Callback<Field>,
    pub onapply: Callback<()>,
    pub oncancel: Callback<()>,
}

fn select_field(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    fields: &[Field],
    onchange: &Callback<Field>,
) -> Html {
    let current = fields
        .iter()
        .find(|(field, _)| field == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();

    let onchange = {
        let onchange = onchange.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            log::trace!("{} changed to {}", name, select.value());
            onchange.emit((name.to_string(), select.value()));
        })
    };

    html! {
        <label>
            {label}
            <select {name} {onchange}>
                {
                    for options.iter().map(|&option| html! {
                        <option value={option} selected={option == current}>{option}</option>
                    })
                }
            </select>
        </label>
    }
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let onapply = props.onapply.reform(|_: MouseEvent| ());
    let oncancel = props.oncancel.reform(|_: MouseEvent| ());

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Level"}</h2>
                {select_field("side", "Grid size", SIDE_OPTIONS, &props.fields, &props.onchange)}
                {select_field("interval", "Interval (ms)", INTERVAL_OPTIONS, &props.fields, &props.onchange)}
                {select_field("probability", "Display chance (%)", PROBABILITY_OPTIONS, &props.fields, &props.onchange)}
                <footer>
                    <button type="reset" onclick={oncancel}>{"Cancel"}</button>
                    <button onclick={onapply}>{"Apply"}</button>
                </footer>
            </article>
        </dialog>
    }
}
