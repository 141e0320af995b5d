use super::*;

fn admin() -> Session {
    Session::authenticated("root", true)
}

fn member() -> Session {
    Session::authenticated("u1", false)
}

// =============================================================================
// Route
// =============================================================================

#[test]
fn parse_known_paths() {
    assert_eq!(Route::parse("/"), Route::Home);
    assert_eq!(Route::parse(""), Route::Home);
    assert_eq!(Route::parse("/blogposts"), Route::BlogPosts);
    assert_eq!(Route::parse("/post/abc123"), Route::Post("abc123".into()));
    assert_eq!(Route::parse("/register"), Route::Register);
    assert_eq!(Route::parse("/login"), Route::Login);
    assert_eq!(Route::parse("/logout"), Route::Logout);
    assert_eq!(Route::parse("/createPost"), Route::CreatePost);
    assert_eq!(Route::parse("/admin-dashboard"), Route::AdminDashboard);
}

#[test]
fn parse_ignores_query_fragment_and_trailing_slash() {
    assert_eq!(Route::parse("/login/?next=/blogposts"), Route::Login);
    assert_eq!(Route::parse("/post/p1#comments"), Route::Post("p1".into()));
}

#[test]
fn parse_unknown_paths_are_not_found() {
    assert_eq!(Route::parse("/post"), Route::NotFound);
    assert_eq!(Route::parse("/post/p1/edit"), Route::NotFound);
    assert_eq!(Route::parse("/CREATEPOST"), Route::NotFound);
    assert_eq!(Route::parse("/nope"), Route::NotFound);
}

#[test]
fn path_inverts_parse() {
    for route in [
        Route::Home,
        Route::BlogPosts,
        Route::Post("p1".into()),
        Route::Register,
        Route::Login,
        Route::Logout,
        Route::CreatePost,
        Route::AdminDashboard,
    ] {
        assert_eq!(Route::parse(&route.path()), route);
    }
}

// =============================================================================
// nav_links
// =============================================================================

#[test]
fn anonymous_sees_login_and_register() {
    assert_eq!(nav_links(&Session::anonymous()), [NavLink::Home, NavLink::Login, NavLink::Register]);
}

#[test]
fn member_sees_posts_and_logout_without_dashboard() {
    assert_eq!(nav_links(&member()), [NavLink::Home, NavLink::BlogPosts, NavLink::Logout]);
}

#[test]
fn admin_sees_dashboard_link() {
    assert_eq!(
        nav_links(&admin()),
        [NavLink::Home, NavLink::BlogPosts, NavLink::AdminDashboard, NavLink::Logout]
    );
}

#[test]
fn link_labels_and_routes() {
    assert_eq!(NavLink::AdminDashboard.label(), "Admin Dashboard");
    assert_eq!(NavLink::AdminDashboard.route(), Route::AdminDashboard);
    assert_eq!(NavLink::BlogPosts.label(), "Blog Posts");
}

// =============================================================================
// route_access
// =============================================================================

#[test]
fn dashboard_only_exists_for_admins() {
    assert_eq!(route_access(&Route::AdminDashboard, &Session::anonymous()), RouteAccess::NotFound);
    assert_eq!(route_access(&Route::AdminDashboard, &member()), RouteAccess::NotFound);
    assert_eq!(
        route_access(&Route::AdminDashboard, &admin()),
        RouteAccess::Render(Route::AdminDashboard)
    );
}

#[test]
fn login_redirects_home_when_authenticated() {
    assert_eq!(route_access(&Route::Login, &member()), RouteAccess::Redirect(Route::Home));
    assert_eq!(route_access(&Route::Login, &Session::anonymous()), RouteAccess::Render(Route::Login));
}

#[test]
fn public_routes_render_for_everyone() {
    for session in [Session::anonymous(), member(), admin()] {
        assert_eq!(route_access(&Route::Home, &session), RouteAccess::Render(Route::Home));
        assert_eq!(
            route_access(&Route::Post("p1".into()), &session),
            RouteAccess::Render(Route::Post("p1".into()))
        );
        assert_eq!(route_access(&Route::NotFound, &session), RouteAccess::NotFound);
    }
}

#[test]
fn comment_form_requires_a_user() {
    assert!(!can_comment(&Session::anonymous()));
    assert!(can_comment(&member()));
}
