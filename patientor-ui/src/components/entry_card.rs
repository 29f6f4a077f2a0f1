use patientor_core::EntryView;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EntryCardProps {
    pub entry: EntryView,
}

#[function_component(EntryCard)]
pub fn entry_card(props: &EntryCardProps) -> Html {
    let entry = &props.entry;

    html! {
        <article class="entry-card">
            <header class="entry-card-header">
                <span class="entry-date">{ entry.date.clone() }</span>
                <span class="entry-tag" data-color={entry.kind_color}>{ entry.kind_label }</span>
            </header>
            <p class="entry-specialist">{ entry.specialist.clone() }</p>
            <p class="entry-description">
                {
                    entry.rating.map(|rating| html! {
                        <span
                            class="rating-heart"
                            data-color={rating.icon_color}
                            title={rating.rating.label()}
                            aria-label={rating.rating.label()}
                        >{"♥"}</span>
                    }).unwrap_or_default()
                }
                { entry.description.clone() }
            </p>
            {
                if entry.diagnosis_lines.is_empty() {
                    Html::default()
                } else {
                    html! {
                        <div class="entry-diagnoses">
                            <h4>{"Diagnoses"}</h4>
                            <ul>
                                { for entry.diagnosis_lines.iter().map(|line| html! { <li>{ line.clone() }</li> }) }
                            </ul>
                        </div>
                    }
                }
            }
            { entry.detail_line.as_ref().map(|detail| html! { <p class="entry-detail">{ detail.clone() }</p> }).unwrap_or_default() }
        </article>
    }
}
