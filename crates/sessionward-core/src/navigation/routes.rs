/// Login entry point
pub const LOGIN_ROUTE: &str = "/login";

/// Where signed-in users land
pub const LANDING_ROUTE: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub requires_auth: bool,
    pub redirect: Option<String>,
}

impl RouteDescriptor {
    pub fn public(path: &str) -> Self {
        Self {
            path: path.to_string(),
            requires_auth: false,
            redirect: None,
        }
    }

    pub fn protected(path: &str) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path)
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            redirect: Some(to.to_string()),
            ..Self::public(path)
        }
    }
}

/// A navigation target after lookup in the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub requires_auth: bool,
    /// False for paths only the catch-all (not found) view matches
    pub matched: bool,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    login_route: String,
    landing_route: String,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>, login_route: &str, landing_route: &str) -> Self {
        Self {
            routes,
            login_route: normalize(login_route),
            landing_route: normalize(landing_route),
        }
    }

    /// The admin dashboard's routes
    pub fn dashboard() -> Self {
        Self::new(
            vec![
                RouteDescriptor::redirect("/", LANDING_ROUTE),
                RouteDescriptor::protected("/dashboard"),
                RouteDescriptor::protected("/users"),
                RouteDescriptor::public("/categories"),
                RouteDescriptor::protected("/suppliers"),
                RouteDescriptor::protected("/services"),
                RouteDescriptor::public(LOGIN_ROUTE),
            ],
            LOGIN_ROUTE,
            LANDING_ROUTE,
        )
    }

    /// Same routes with different login and landing locations
    ///
    /// Redirects that pointed at the old landing route (such as `/`) follow
    /// it to the new one.
    pub fn with_entry_points(mut self, login_route: &str, landing_route: &str) -> Self {
        let old_landing = std::mem::replace(&mut self.landing_route, normalize(landing_route));
        self.login_route = normalize(login_route);
        for route in &mut self.routes {
            if route.redirect.as_deref().map(normalize).as_deref() == Some(old_landing.as_str()) {
                route.redirect = Some(self.landing_route.clone());
            }
        }
        self
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    pub fn find(&self, path: &str) -> Option<&RouteDescriptor> {
        let path = normalize(path);
        self.routes.iter().find(|r| normalize(&r.path) == path)
    }

    /// Redirect configured for `path`, if any
    pub fn redirect_for(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(|r| r.redirect.as_deref())
    }

    pub fn resolve(&self, path: &str) -> Route {
        match self.find(path) {
            Some(descriptor) => Route {
                path: normalize(&descriptor.path),
                requires_auth: descriptor.requires_auth,
                matched: true,
            },
            None => Route {
                path: normalize(path),
                requires_auth: false,
                matched: false,
            },
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::dashboard()
    }
}

/// Leading slash, no trailing slash (except for the root), no query or fragment.
pub fn normalize(path: &str) -> String {
    let path = path
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}
