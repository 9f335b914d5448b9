//! Debug script to see what the PHP parser extracts from a file.
//!
//! Usage: `debug_parse path/to/SomeController.php`

use std::path::Path;
use waymaker::frontend::php::parser::PhpParser;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: debug_parse <file.php>");
        std::process::exit(2);
    };
    let path = Path::new(&path);

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let mut parser = match PhpParser::new() {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(1);
        }
    };

    match parser.parse(&source, path) {
        Ok(parsed) => {
            println!("Parsed file: {:?} (syntax errors: {})", parsed.path, parsed.has_errors);
            println!("\nImports:");
            for import in &parsed.imports {
                println!("  {} as {}", import.name, import.alias);
            }
            println!("\nClasses:");
            for class in &parsed.classes {
                println!("  {} (abstract: {})", class.qualified_name(), class.is_abstract);
                if let Some(parent) = &class.parent {
                    println!("    extends {}", parent);
                }
                for prop in class.properties.iter().filter(|p| p.is_static) {
                    println!("    static ${} = {:?}", prop.name, prop.value);
                }
                for method in &class.methods {
                    println!("    {:?} {}() at {}", method.visibility, method.name, method.span);
                    for attr in &method.attributes {
                        println!("      #[{}] {:?}", attr.name, attr.arguments);
                    }
                }
            }
        }
        Err(e) => {
            println!("Error: {:?}", e);
        }
    }
}
