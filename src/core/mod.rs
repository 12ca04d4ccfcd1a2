// ─── ModRefresh Core ───
// Identifies uploaded Minecraft mod jars and packages compatible updates.
//
// Architecture:
//   core/
//     mods/        Upload handle, descriptor, loader enum
//     metadata/    Embedded metadata readers (fabric, mods.toml, mcmod.info, quilt, neoforge)
//     naming       Search names and query variants from file names
//     registry/    Modrinth + CurseForge clients behind async traits
//     matcher/     Variant search + tiered candidate selection
//     resolver     Newest compatible release per matched mod
//     downloader/  Streaming downloads with SHA-1 validation
//     package/     Update zip + plain-text report
//     version/     Mojang manifest for selectable game versions
//     session      Wires everything for one user session

pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod matcher;
pub mod metadata;
pub mod mods;
pub mod naming;
pub mod package;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod version;
