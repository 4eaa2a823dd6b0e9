use nscope::{Error, Event, Resolver};

fn main() -> Result<(), Error> {
    let mut resolver = Resolver::new();

    let events = resolver.parse(r#"<doc xmlns="urn:d" xmlns:a="urn:a"><a:p a:x="1"/></doc>"#)?;
    for event in &events {
        if let Event::Start {
            name, attributes, ..
        } = event
        {
            println!("{}", name);
            for (attribute, value) in attributes {
                println!("  {} = {}", attribute, value);
            }
        }
    }
    Ok(())
}
