use maud::{html, Markup};

/// Routes advertised on the landing page.
const ROUTES: [(&str, Option<&str>); 5] = [
    ("/api/v1.0/precipitation", None),
    ("/api/v1.0/stations", None),
    ("/api/v1.0/tobs", None),
    (
        "/api/v1.0/start",
        Some("---where start is of the format year-month-day"),
    ),
    (
        "/api/v1.0/start/end",
        Some("---where start and end are of the format year-month-day"),
    ),
];

pub fn home_page() -> Markup {
    html! {
        "Available Routes: " br;
        @for (route, hint) in ROUTES {
            (route) " " br;
            @if let Some(hint) = hint {
                (hint) " " br;
            }
        }
    }
}
