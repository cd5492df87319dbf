use std::env;

#[tokio::main]
async fn main() -> Result<(), husk::Error> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "example.com".into());
    let path = args.next().unwrap_or_else(|| "/".into());

    let res = husk::get(&host, &path, &[], None, None, true).await?;

    println!("status: {}", res.status());
    for (name, value) in res.headers().iter() {
        println!("{name}: {value}");
    }
    println!("\n{} body bytes", res.body().len());

    Ok(())
}
