use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{ComposeView, HomeView, ResultsView, TakeView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/take/:test_id", TakeView)] Take { test_id: u64 },
        #[route("/compose", ComposeView)] Compose {},
        #[route("/results/:test_id", ResultsView)] Results { test_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Quizdesk" }
            ul {
                li { Link { to: Route::Home {}, "Тесты" } }
                li { Link { to: Route::Compose {}, "Создание теста" } }
            }
        }
    }
}
