//! Interactive city directory.

use cityweather_core::{CityLoader, LoadState, SortKey};
use inquire::{InquireError, Select, Text};
use std::fmt;

use crate::{cli::App, render};

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Open,
    Search,
    Sort(SortKey),
    LoadMore,
    Retry,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Open => f.write_str("Open a city"),
            Action::Search => f.write_str("Search for city..."),
            Action::Sort(key) => write!(f, "Sort by {}", key.label()),
            Action::LoadMore => f.write_str("Load more"),
            Action::Retry => f.write_str("Retry"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

/// Menu entries that make sense for the loader's current state.
fn actions(loader: &CityLoader) -> Vec<Action> {
    let mut actions = Vec::new();
    if !loader.visible().is_empty() {
        actions.push(Action::Open);
    }
    actions.push(Action::Search);
    actions.extend(SortKey::all().iter().copied().map(Action::Sort));
    match loader.state() {
        LoadState::Idle => actions.push(Action::LoadMore),
        LoadState::Errored => actions.push(Action::Retry),
        LoadState::Loading | LoadState::Exhausted => {}
    }
    actions.push(Action::Quit);
    actions
}

/// Esc and Ctrl-C both mean "back".
fn skippable<T>(result: Result<Option<T>, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

struct CityOption {
    label: String,
    name: String,
}

impl fmt::Display for CityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub async fn run(app: &App) -> anyhow::Result<()> {
    let mut loader = CityLoader::new(app.page_size);
    loader.mount(&app.catalog).await;

    loop {
        print!("{}", render::city_table(&loader));

        let choice = skippable(Select::new("What next?", actions(&loader)).prompt_skippable())?;
        match choice {
            None | Some(Action::Quit) => break,
            Some(Action::Search) => {
                let text = Text::new("Search for city...")
                    .with_initial_value(loader.search())
                    .prompt_skippable();
                if let Some(text) = skippable(text)? {
                    loader.set_search(text);
                }
            }
            Some(Action::Sort(key)) => loader.set_sort(key),
            Some(Action::LoadMore) => {
                loader.load_on_end_reached(&app.catalog).await;
            }
            Some(Action::Retry) => {
                loader.load_next_page(&app.catalog).await;
            }
            Some(Action::Open) => {
                let options: Vec<CityOption> = loader
                    .visible()
                    .into_iter()
                    .map(|city| CityOption {
                        label: render::city_label(city),
                        name: city.name.clone(),
                    })
                    .collect();

                let picked = skippable(Select::new("City:", options).prompt_skippable())?;
                if let Some(city) = picked {
                    app.show(&city.name).await;
                }
            }
        }
    }

    Ok(())
}
