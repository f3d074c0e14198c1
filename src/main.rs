use actix_web::{App, HttpServer, middleware, web};

use storefront_gateway::cache::CacheStore;
use storefront_gateway::erp::JsonRpcClient;
use storefront_gateway::models::config::ServerConfig;
use storefront_gateway::repository::ErpRepository;
use storefront_gateway::routes::categories::{
    show_categories, show_category_tree, show_public_categories, show_public_category_tree,
};
use storefront_gateway::routes::misc::{cache_status, clear_cache, health, show_ribbons};
use storefront_gateway::routes::products::{
    show_bestsellers, show_new_arrivals, show_product, show_product_by_slug, show_products,
    show_products_by_category, show_products_by_public_category,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::load().map_err(std::io::Error::other)?;
    let bind_addr = (config.host.clone(), config.port);

    let client = JsonRpcClient::new(&config.erp);
    let repo = web::Data::new(ErpRepository::new(client));
    let cache = web::Data::new(CacheStore::new());
    let config = web::Data::new(config);

    log::info!(
        "starting storefront gateway on {}:{}",
        bind_addr.0,
        bind_addr.1
    );

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .app_data(cache.clone())
            .app_data(config.clone())
            .wrap(middleware::Logger::default())
            .service(health)
            .service(show_categories)
            .service(show_category_tree)
            .service(show_public_categories)
            .service(show_public_category_tree)
            // Fixed product paths are registered before the `{id}` catch-all.
            .service(show_bestsellers)
            .service(show_new_arrivals)
            .service(show_products_by_category)
            .service(show_products_by_public_category)
            .service(show_products)
            .service(show_product)
            .service(show_product_by_slug)
            .service(show_ribbons)
            .service(clear_cache)
            .service(cache_status)
    })
    .bind(bind_addr)?
    .run()
    .await
}
