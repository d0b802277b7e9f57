use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::movie,
    forms::{AddForm, EditForm, FormErrors},
    models::{RankedMovie, SearchResult},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[RankedMovie]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "Ranked by your own ratings." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "Your list is empty. Add a movie to get started." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for ranked in movies {
                                (movie_card(ranked))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(movie: &movie::Model, form: &EditForm, errors: &FormErrors, csrf: &str) -> String {
    page(
        "Edit movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" {
                            (movie.title)
                            span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                        }
                        p class="mt-2 text-gray-600" { "Edit your rating and review." }

                        form class="mt-8 space-y-6" method="post" action=(format!("/edit/{}", movie.id)) {
                            input type="hidden" name="csrf_token" value=(csrf);
                            (form_error(errors))
                            div {
                                label class="block text-sm font-medium text-gray-700" for="new_rating" { "Your rating out of 10, e.g. 7.5" }
                                input class=(INPUT_CLASS) name="new_rating" id="new_rating" value=(form.new_rating) inputmode="decimal" required;
                                (field_error(errors, "new_rating"))
                            }
                            div {
                                label class="block text-sm font-medium text-gray-700" for="new_review" { "Your review" }
                                input class=(INPUT_CLASS) name="new_review" id="new_review" value=(form.new_review) maxlength="500" required;
                                (field_error(errors, "new_review"))
                            }
                            button class=(BUTTON_CLASS) type="submit" { "Done" }
                        }
                        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to list" }
                    }
                }
            }
        },
    )
}

pub fn add_page(form: &AddForm, errors: &FormErrors, csrf: &str) -> String {
    page(
        "Add movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Add a movie" }

                        form class="mt-8 space-y-6" method="post" action="/add" {
                            input type="hidden" name="csrf_token" value=(csrf);
                            (form_error(errors))
                            div {
                                label class="block text-sm font-medium text-gray-700" for="title" { "Movie title" }
                                input class=(INPUT_CLASS) name="title" id="title" value=(form.title) maxlength="250" required;
                                (field_error(errors, "title"))
                            }
                            button class=(BUTTON_CLASS) type="submit" { "Add movie" }
                        }
                        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to list" }
                    }
                }
            }
        },
    )
}

pub fn select_page(query: &str, candidates: &[SearchResult]) -> String {
    page(
        "Select movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Select movie" }
                        p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }

                        @if candidates.is_empty() {
                            p class="mt-8 text-gray-600" { "No movies matched that title." }
                        } @else {
                            ul class="mt-8 divide-y divide-gray-200" {
                                @for candidate in candidates {
                                    li class="py-3" {
                                        a class="text-blue-600 hover:text-blue-800" href=(format!("/select?id={}", candidate.external_id)) {
                                            (candidate.original_title)
                                        }
                                        @if !candidate.release_date.is_empty() {
                                            span class="ml-2 text-sm text-gray-500" { "(" (candidate.release_date) ")" }
                                        }
                                    }
                                }
                            }
                        }
                        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/add" { "Search again" }
                    }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" {
                            (status.canonical_reason().unwrap_or("Error"))
                        }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_card(ranked: &RankedMovie) -> Markup {
    let movie = &ranked.movie;
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            img class="w-24 rounded" src=(movie.img_url) alt=(format!("{} poster", movie.title));
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        span class="mr-2 text-gray-400" { "#" (ranked.ranking) }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    span class="text-lg font-bold text-yellow-600" { (format!("{:.1}", movie.rating)) }
                }
                p class="mt-2 italic text-gray-700" { "\u{201c}" (movie.review) "\u{201d}" }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit/{}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

fn form_error(errors: &FormErrors) -> Markup {
    html! {
        @if let Some(message) = errors.form() {
            div class="rounded-md bg-red-50 p-4 text-sm text-red-700" role="alert" { (message) }
        }
    }
}

fn field_error(errors: &FormErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.field(field) {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}
