use layerconf::{AppContext, Bind, Resolver, Schema};

#[derive(Debug, Default)]
struct AppConfig {
    name: String,
    debug: bool,
    database: DatabaseConfig,
}

impl Bind for AppConfig {
    fn schema(fields: &mut Schema<Self>) {
        fields.field("name", |c| &mut c.name).key("APP_NAME").required();
        fields.field("debug", |c| &mut c.debug).default("false");
        fields.nested("database", |c| &mut c.database);
    }
}

#[derive(Debug, Default)]
struct DatabaseConfig {
    host: String,
    port: u16,
    name: String,
}

impl Bind for DatabaseConfig {
    fn schema(fields: &mut Schema<Self>) {
        fields
            .field("host", |c| &mut c.host)
            .key("DATABASE_HOST")
            .default("localhost");
        fields
            .field("port", |c| &mut c.port)
            .key("DATABASE_PORT")
            .default("5432");
        fields
            .field("name", |c| &mut c.name)
            .key("DATABASE_NAME")
            .required();
    }
}

fn main() -> Result<(), layerconf::Error> {
    tracing_subscriber::fmt::init();

    let mut resolver = Resolver::new();
    let report = resolver.load_configs("demos/configs")?;
    println!("active environment: {}", report.env_name);

    let ctx: AppContext<AppConfig> = AppContext::builder()
        .with_resolver(resolver)
        .build()?;

    let config = ctx.config();
    println!("App: {} (debug={})", config.name, config.debug);
    println!(
        "Database: {}:{}/{}",
        config.database.host, config.database.port, config.database.name
    );

    Ok(())
}
