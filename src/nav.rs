//! Routes, navigation links and identity-based route gating.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every surface that decides what to offer the user (nav bar, route guards,
//! comment form) goes through these functions so the session is interpreted
//! the same way everywhere.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use crate::state::session::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    BlogPosts,
    Post(String),
    Register,
    Login,
    Logout,
    CreatePost,
    AdminDashboard,
    NotFound,
}

impl Route {
    /// Match a location path. Query string, fragment and trailing slash are ignored.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = path.trim_end_matches('/');
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["blogposts"] => Self::BlogPosts,
            ["post", id] => Self::Post((*id).to_owned()),
            ["register"] => Self::Register,
            ["login"] => Self::Login,
            ["logout"] => Self::Logout,
            ["createPost"] => Self::CreatePost,
            ["admin-dashboard"] => Self::AdminDashboard,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::BlogPosts => "/blogposts".to_owned(),
            Self::Post(id) => format!("/post/{id}"),
            Self::Register => "/register".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Logout => "/logout".to_owned(),
            Self::CreatePost => "/createPost".to_owned(),
            Self::AdminDashboard => "/admin-dashboard".to_owned(),
            Self::NotFound => "/404".to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavLink {
    Home,
    BlogPosts,
    AdminDashboard,
    Logout,
    Login,
    Register,
}

impl NavLink {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::BlogPosts => "Blog Posts",
            Self::AdminDashboard => "Admin Dashboard",
            Self::Logout => "Logout",
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::Home => Route::Home,
            Self::BlogPosts => Route::BlogPosts,
            Self::AdminDashboard => Route::AdminDashboard,
            Self::Logout => Route::Logout,
            Self::Login => Route::Login,
            Self::Register => Route::Register,
        }
    }
}

/// Links shown in the navigation bar for `session`, in display order.
#[must_use]
pub fn nav_links(session: &Session) -> Vec<NavLink> {
    let mut links = vec![NavLink::Home];
    if session.is_authenticated() {
        links.push(NavLink::BlogPosts);
        if session.is_admin() {
            links.push(NavLink::AdminDashboard);
        }
        links.push(NavLink::Logout);
    } else {
        links.extend([NavLink::Login, NavLink::Register]);
    }
    links
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    Render(Route),
    Redirect(Route),
    NotFound,
}

/// Decide what navigating to `route` does for `session`.
///
/// The admin dashboard does not exist for non-admins, so it falls through to
/// not-found rather than redirecting.
#[must_use]
pub fn route_access(route: &Route, session: &Session) -> RouteAccess {
    match route {
        Route::AdminDashboard if !session.is_admin() => RouteAccess::NotFound,
        Route::Login if session.is_authenticated() => RouteAccess::Redirect(Route::Home),
        Route::NotFound => RouteAccess::NotFound,
        other => RouteAccess::Render(other.clone()),
    }
}

/// Whether the comment form is offered under a post.
#[must_use]
pub fn can_comment(session: &Session) -> bool {
    session.is_authenticated()
}
