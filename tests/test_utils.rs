use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use bloglist_backend::{
    entities::{
        blog::{BlogRequest, BlogResponse},
        token::LoginResponse,
        user::{LoginUser, NewUser, User},
    },
    handlers::json_error::unknown_endpoint,
    middlewares::auth::AuthMiddleware,
    repositories::user::UserRepository,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, LogFormat, StorageBackend},
    shared_repos::SharedRepositories,
    AppState,
};
use reqwest::Client;
use std::{net::TcpListener, time::Duration};

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = test_config();
        let state = web::Data::new(AppState::new(&config, SharedRepositories::in_memory()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
                .default_service(web::to(unknown_endpoint))
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/health", address)).send().await.is_err() {
            actix_rt::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register_user(&self, user: &NewUser) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(user)
            .send()
            .await
            .expect("Failed to register user")
    }

    pub async fn login_user(&self, credentials: &LoginUser) -> LoginResponse {
        let response = self.client
            .post(self.url("/api/login"))
            .json(credentials)
            .send()
            .await
            .expect("Failed to login user");

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            panic!("Login failed: ({}): {}", status, body);
        }

        response.json().await.expect("Failed to parse login response")
    }

    /// Registers and logs in a user, returning its bearer token.
    pub async fn token_for(&self, username: &str) -> String {
        let user = new_user(username);
        self.register_user(&user).await;
        self.login_user(&login_for(&user)).await.token
    }

    pub async fn get_user(&self, username: &str) -> User {
        self.state
            .auth_handler
            .user_repo
            .get_user_by_username(username)
            .await
            .expect("User lookup failed")
            .expect("User does not exist")
    }

    pub async fn create_blog(&self, token: &str, blog: &BlogRequest) -> reqwest::Response {
        self.client
            .post(self.url("/api/blogs"))
            .bearer_auth(token)
            .json(blog)
            .send()
            .await
            .expect("Failed to create blog")
    }

    pub async fn get_blogs(&self) -> Vec<BlogResponse> {
        self.client
            .get(self.url("/api/blogs"))
            .send()
            .await
            .expect("Failed to list blogs")
            .json()
            .await
            .expect("Failed to parse blog list")
    }

    /// Inserts the six reference blogs, owned by `token`'s user.
    pub async fn seed_blogs(&self, token: &str) -> Vec<BlogResponse> {
        let mut created = Vec::new();
        for blog in many_blogs() {
            let response = self.create_blog(token, &blog).await;
            assert!(response.status().is_success(), "seeding failed: {}", response.status());
            created.push(response.json().await.expect("Failed to parse created blog"));
        }
        created
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Bloglist API Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        storage: StorageBackend::Memory,
        database_url: String::new(),
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        jwt_expiration_minutes: 60,
        log_format: LogFormat::Pretty,
    }
}

pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        name: Some(format!("{} Tester", username)),
        password: "salainen".to_string(),
    }
}

pub fn login_for(user: &NewUser) -> LoginUser {
    LoginUser {
        username: user.username.clone(),
        password: user.password.clone(),
    }
}

pub fn blog(title: &str, author: &str, url: &str, likes: Option<i64>) -> BlogRequest {
    BlogRequest {
        title: title.to_string(),
        author: author.to_string(),
        url: url.to_string(),
        likes,
    }
}

pub fn many_blogs() -> Vec<BlogRequest> {
    vec![
        blog("React patterns", "Michael Chan", "https://reactpatterns.com/", Some(7)),
        blog(
            "Go To Statement Considered Harmful",
            "Edsger W. Dijkstra",
            "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
            Some(5),
        ),
        blog(
            "Canonical string reduction",
            "Edsger W. Dijkstra",
            "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
            Some(12),
        ),
        blog(
            "First class tests",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll",
            Some(10),
        ),
        blog(
            "TDD harms architecture",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html",
            Some(0),
        ),
        blog(
            "Type wars",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
            Some(2),
        ),
    ]
}
