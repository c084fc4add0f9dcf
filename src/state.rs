use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::external::{GeocodeError, Geocoder, HttpGeocoder, LogMailer, Mailer};
use crate::services::{AuthService, BootcampService, CourseService, ReviewService, UserService};

/// Shared application state: configuration, the storage pool, and the
/// resource services constructed around them. Built once in `main`; no
/// ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub bootcamps: BootcampService,
    pub courses: CourseService,
    pub reviews: ReviewService,
    pub users: UserService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        pool: PgPool,
        geocoder: Arc<dyn Geocoder>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            bootcamps: BootcampService::new(pool.clone(), Arc::clone(&config), geocoder),
            courses: CourseService::new(pool.clone(), Arc::clone(&config)),
            reviews: ReviewService::new(pool.clone(), Arc::clone(&config)),
            users: UserService::new(pool.clone(), Arc::clone(&config)),
            auth: AuthService::new(pool.clone(), Arc::clone(&config), mailer),
            config,
            pool,
        }
    }

    /// Default collaborators: HTTP geocoder plus the logging mailer
    pub fn with_defaults(config: AppConfig, pool: PgPool) -> Result<Self, GeocodeError> {
        let geocoder: Arc<dyn Geocoder> = Arc::new(HttpGeocoder::new(&config.geocoder)?);
        Ok(Self::new(config, pool, geocoder, Arc::new(LogMailer)))
    }
}
