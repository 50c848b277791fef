use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{movie, user},
    flash::{Flash, Level},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(users: &[user::Model], flash: &Option<Flash>) -> String {
    page(
        "MoviWeb",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    (flash_banner(flash))

                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "MoviWeb" }
                        p class="mt-2 text-gray-600" { "Pick a user to browse their movie list, or add a new one." }

                        @if users.is_empty() {
                            p class="mt-8 text-gray-500" { "No users yet." }
                        } @else {
                            ul class="mt-8 divide-y divide-gray-100" {
                                @for user in users {
                                    li class="flex items-center justify-between py-3" {
                                        a class="text-blue-600 hover:text-blue-800 font-medium" href=(format!("/users/{}/movies", user.id)) {
                                            (user.name)
                                        }
                                        form method="post" action=(format!("/user/{}/delete", user.id)) {
                                            button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }

                        form class="mt-8 flex gap-3" method="post" action="/add_user" {
                            input class="flex-1 rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="name" id="name" placeholder="New user name" required;
                            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add user" }
                        }
                    }
                }
            }
        },
    )
}

pub fn movies_page(
    user: &user::Model,
    movies: &[movie::Model],
    query: &str,
    flash: &Option<Flash>,
) -> String {
    page(
        &format!("{}'s movies", user.name),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-10" {
                    (flash_banner(flash))

                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { (user.name) "'s movies" }
                            p class="mt-2 text-gray-600" { (movies.len()) " movie" @if movies.len() != 1 { "s" } }
                        }
                        div class="flex items-center gap-4" {
                            a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All users" }
                            a class="rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700" href=(format!("/users/{}/add_movie", user.id)) { "Add movie" }
                        }
                    }

                    form class="mt-6 flex gap-3" method="get" action=(format!("/users/{}/movies", user.id)) {
                        input class="flex-1 rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name="q" value=(query) placeholder="Search by title";
                        button class="rounded-md border border-gray-300 px-4 py-2 text-sm font-medium text-gray-700 hover:bg-gray-100" type="submit" { "Search" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            @if query.is_empty() {
                                p class="text-gray-600" { "No movies yet. Add the first one!" }
                            } @else {
                                p class="text-gray-600" { "No movies match \"" (query) "\"." }
                            }
                        }
                    } @else {
                        div class="mt-10 grid gap-4 md:grid-cols-2" {
                            @for movie in movies {
                                (movie_card(user.id, movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_movie_page(user: &user::Model, flash: &Option<Flash>) -> String {
    page(
        "Add movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    (flash_banner(flash))

                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Add a movie for " (user.name) }
                        p class="mt-2 text-sm text-gray-500" { "Leave director or year blank to fill them from OMDb." }

                        form class="mt-8 space-y-6" method="post" action=(format!("/users/{}/add_movie", user.id)) {
                            (text_field("name", "Title", "", true))
                            (text_field("director", "Director", "", false))
                            (text_field("year", "Year", "", false))
                            (text_field("poster_url", "Poster URL", "", false))

                            div class="flex items-center gap-4" {
                                button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add movie" }
                                a class="text-sm text-gray-600 hover:text-gray-800" href=(format!("/users/{}/movies", user.id)) { "Cancel" }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_movie_page(user_id: i32, movie: &movie::Model, flash: &Option<Flash>) -> String {
    page(
        "Edit movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    (flash_banner(flash))

                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Edit \"" (movie.name) "\"" }

                        form class="mt-8 space-y-6" method="post" action=(format!("/users/{}/movies/{}/update", user_id, movie.id)) {
                            (text_field("name", "Title", &movie.name, true))
                            (text_field("director", "Director", &movie.director, true))
                            (text_field("year", "Year", &movie.year.to_string(), true))
                            (text_field("poster_url", "Poster URL", movie.poster_url.as_deref().unwrap_or(""), false))

                            div class="flex items-center gap-4" {
                                button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Save changes" }
                                a class="text-sm text-gray-600 hover:text-gray-800" href=(format!("/users/{}/movies", user_id)) { "Cancel" }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page() -> String {
    status_page("Page not found", "The page you are looking for does not exist.")
}

pub fn server_error_page() -> String {
    status_page("Something went wrong", "An internal error occurred. Please try again.")
}

fn status_page(title: &str, message: &str) -> String {
    page(
        title,
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (title) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to users" }
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

fn flash_banner(flash: &Option<Flash>) -> Markup {
    html! {
        @if let Some(flash) = flash {
            div class=(format!("mb-6 rounded-md px-4 py-3 text-sm {}", flash_classes(flash.level))) { (flash.message) }
        }
    }
}

fn flash_classes(level: Level) -> &'static str {
    match level {
        Level::Success => "bg-green-50 border border-green-200 text-green-800",
        Level::Error => "bg-red-50 border border-red-200 text-red-800",
    }
}

fn text_field(name: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" name=(name) id=(name) value=(value) required[required];
        }
    }
}

fn movie_card(user_id: i32, movie: &movie::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            div class="flex items-start gap-4" {
                @if let Some(poster) = &movie.poster_url {
                    img class="h-28 w-20 rounded object-cover" src=(poster) alt=(movie.name);
                }
                div class="flex-1" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        (movie.name)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    p class="mt-1 text-sm text-gray-600" { (movie.director) }

                    div class="mt-4 flex items-center gap-4" {
                        a class="text-sm text-blue-600 hover:text-blue-800" href=(format!("/users/{}/movies/{}/update", user_id, movie.id)) { "Edit" }
                        form method="post" action=(format!("/users/{}/movies/{}/delete", user_id, movie.id)) {
                            button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                        }
                    }
                }
            }
        }
    }
}
