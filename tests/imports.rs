use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use helpers::typegen_command_with_fake_dir;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::process::Command;

mod helpers;

const SHARED_PACKAGE: &str = "
fragment MenuCard on StorefrontMenu {
  id
  name
}

fragment MenuCardWithItems on StorefrontMenu {
  status
  ...MenuCard
}
";

const IMPORTING_QUERY: &str = "
# import { MenuCardWithItems } from \"@pkg/menus\"

query CardMenus($shopID: String!, $id: String!) {
  storefrontMenus(shop_id: $shopID, ids: [$id]) {
    ...MenuCardWithItems
  }
}
";

/// Writes a fragment package under `pkg/menus` and returns the include rule
/// pointing `@pkg` at it.
fn setup_shared_package(temp_dir: &TempDir) -> String {
    temp_dir
        .child("pkg/menus/cards.graphql")
        .write_str(SHARED_PACKAGE)
        .unwrap();
    format!(
        "pkg={}=@generated/pkg",
        temp_dir.path().join("pkg").display()
    )
}

/// The source directory lives next to the package so the package is not
/// scanned as part of the compile root.
fn importing_project() -> (Command, TempDir, String) {
    let mut cmd = Command::cargo_bin("typegen").unwrap();
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let include_rule = setup_shared_package(&temp_dir);
    temp_dir
        .child("src/queries.graphql")
        .write_str(IMPORTING_QUERY)
        .unwrap();
    cmd.arg("graphql")
        .arg(temp_dir.path().join("src"))
        .arg("--schema")
        .arg(helpers::SDL_SCHEMA_PATH)
        .arg("-I")
        .arg(&include_rule);
    (cmd, temp_dir, include_rule)
}

#[test]
fn imported_fragments_are_referenced_externally() {
    let (mut cmd, temp_dir, _) = importing_project();
    cmd.assert().success();

    let types = std::fs::read_to_string(temp_dir.path().join("src/types.ts")).unwrap();
    assert!(types.contains(
        "import type { MenuCardWithItemsFragment } from \"@generated/pkg/menus/types\";"
    ));
    assert!(types.contains("storefrontMenus: Array<MenuCardWithItemsFragment> | null;"));
    // The foreign fragment types stay foreign.
    assert!(!types.contains("export interface MenuCardFragment"));

    let operation =
        std::fs::read_to_string(temp_dir.path().join("src/operations/CardMenusQuery.ts")).unwrap();
    assert!(operation
        .contains("import MenuCard from \"@generated/pkg/menus/fragments/MenuCard\";"));
    assert!(operation.contains(
        "import MenuCardWithItems from \"@generated/pkg/menus/fragments/MenuCardWithItems\";"
    ));
    assert!(operation.contains("export default (MenuCard + MenuCardWithItems + \"query CardMenus"));
}

fn assert_src_file(temp_dir: &TempDir, relative_path: &str, expected: &str) {
    let path = temp_dir.path().join("src").join(relative_path);
    let actual = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        actual,
        format!("{}{}\n", helpers::GENERATED_HEADER, expected.trim()),
        "unexpected contents for {relative_path}"
    );
}

#[test]
fn embed_imports_inlines_fragments_and_named_types() {
    let (mut cmd, temp_dir, _) = importing_project();
    cmd.arg("--embed-imports");
    cmd.assert().success();

    assert_src_file(
        &temp_dir,
        "types.ts",
        "
export type ArbitraryObjectType = any;

export type MenuStatus = \"DRAFT\" | \"PUBLISHED\";

export interface MenuCardFragment {
  id: string;
  name: string;
}

export type MenuCardWithItemsFragment = MenuCardFragment & {
  status: MenuStatus;
};

export interface CardMenusQuery {
  storefrontMenus: Array<MenuCardWithItemsFragment> | null;
}

export interface CardMenusQueryVariables {
  id: string;
  shopID: string;
}

export interface CardMenusQueryMeta {
  result: CardMenusQuery;
  variables: CardMenusQueryVariables;
  kind: \"graphql-operation\";
}
",
    );
    assert_src_file(
        &temp_dir,
        "fragments/MenuCard.ts",
        "export default \"fragment MenuCard on StorefrontMenu{id name}\\n\";",
    );
    assert_src_file(
        &temp_dir,
        "operations/CardMenusQuery.ts",
        "
import MenuCard from \"../fragments/MenuCard\";
import MenuCardWithItems from \"../fragments/MenuCardWithItems\";
import type { CardMenusQueryMeta } from \"../types\";

export default (MenuCard + MenuCardWithItems + \"query CardMenus($shopID:String!,$id:String!){storefrontMenus(shop_id:$shopID,ids:[$id]){...MenuCardWithItems}}\\n\") as unknown as CardMenusQueryMeta;
",
    );
}

#[test]
fn duplicate_import_paths_for_one_fragment_fail() {
    let mut cmd = Command::cargo_bin("typegen").unwrap();
    let temp_dir = assert_fs::TempDir::new().unwrap();
    temp_dir
        .child("pkg/a/shared.graphql")
        .write_str("fragment Shared on StorefrontMenu {\n  id\n}\n")
        .unwrap();
    temp_dir
        .child("pkg/b/shared.graphql")
        .write_str("fragment Shared on StorefrontMenu {\n  name\n}\n")
        .unwrap();
    temp_dir
        .child("src/queries.graphql")
        .write_str(
            "
# import { Shared } from \"@pkg/a\"
# import { Shared } from \"@pkg/b\"

query GetMenu($id: String!) {
  menu(id: $id) {
    ...Shared
  }
}
",
        )
        .unwrap();
    cmd.arg("graphql")
        .arg(temp_dir.path().join("src"))
        .arg("--schema")
        .arg(helpers::SDL_SCHEMA_PATH)
        .arg("-I")
        .arg(format!(
            "pkg={}=@generated/pkg",
            temp_dir.path().join("pkg").display()
        ));
    cmd.assert().failure().stdout(contains(
        "fragment `Shared` is imported from both `@pkg/a` and `@pkg/b`",
    ));
}

#[test]
fn nested_imports_are_rejected() {
    let mut cmd = Command::cargo_bin("typegen").unwrap();
    let temp_dir = assert_fs::TempDir::new().unwrap();
    temp_dir
        .child("pkg/menus/cards.graphql")
        .write_str(
            "# import * from \"@pkg/other\"\nfragment MenuCard on StorefrontMenu {\n  id\n}\n",
        )
        .unwrap();
    temp_dir
        .child("src/queries.graphql")
        .write_str(
            "
# import { MenuCard } from \"@pkg/menus\"

query GetMenu($id: String!) {
  menu(id: $id) {
    ...MenuCard
  }
}
",
        )
        .unwrap();
    cmd.arg("graphql")
        .arg(temp_dir.path().join("src"))
        .arg("--schema")
        .arg(helpers::SDL_SCHEMA_PATH)
        .arg("-I")
        .arg(format!(
            "pkg={}=@generated/pkg",
            temp_dir.path().join("pkg").display()
        ));
    cmd.assert()
        .failure()
        .stdout(contains("nested imports are not supported"));
}

#[test]
fn missing_fragment_in_import_path_fails() {
    let (mut cmd, temp_dir, _include_rule) = importing_project();
    // Overwrite the query to request an undefined fragment.
    temp_dir
        .child("src/queries.graphql")
        .write_str(
            "
# import { NotThere } from \"@pkg/menus\"

query GetMenu($id: String!) {
  menu(id: $id) {
    ...NotThere
  }
}
",
        )
        .unwrap();
    cmd.assert().failure().stdout(contains(
        "fragment `NotThere` is not defined under import `@pkg/menus`",
    ));
}

#[test]
fn unresolvable_import_path_fails() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str(
            "
# import * from \"@missing/package\"

query GetMenu($id: String!) {
  menu(id: $id) {
    id
  }
}
",
        )
        .unwrap();
    cmd.assert()
        .failure()
        .stdout(contains("could not read `@missing/package`").or(contains("@missing/package")));
}
