//! End-to-end compilation of small hand-written graphs.

use weft_codegen::{CompileOptions, Target};
use weft_config::BoardRules;
use weft_conformance::{compile_all, compile_target, project};

const INPUT_TO_OUTPUT: &str = r#"{
  "design": {
    "graph": {
      "blocks": [
        {"id": "a", "type": "basic.input", "data": {"name": "btn", "pins": [{"index": "0", "value": "2"}]}},
        {"id": "b", "type": "basic.output", "data": {"name": "led", "pins": [{"index": "0", "value": "3"}]}}
      ],
      "wires": [
        {"source": {"block": "a", "port": "out"}, "target": {"block": "b", "port": "in"}}
      ]
    }
  }
}"#;

#[test]
fn input_wired_to_output() {
    let p = project(INPUT_TO_OUTPUT);
    let out = compile_all(&p, &CompileOptions::default(), &BoardRules::default()).unwrap();

    assert_eq!(
        out.verilog,
        "\nmodule main (\n input va,\n output vb\n);\n wire w0;\n assign w0 = va;\n assign vb = w0;\nendmodule\n"
    );
    assert_eq!(out.verilog.matches("wire ").count(), 1);
    assert_eq!(out.verilog.matches("assign ").count(), 2);
    assert_eq!(out.pcf, "set_io va 2\nset_io vb 3\n");
    assert_eq!(out.gtkwave, "main_tb.btn\nmain_tb.led\n");
}

#[test]
fn constant_feeds_generic_parameter() {
    let p = project(
        r#"{
      "design": {
        "graph": {
          "blocks": [
            {"id": "k", "type": "basic.constant", "data": {"name": "N", "value": "5"}},
            {"id": "g", "type": "divider", "data": {}}
          ],
          "wires": [
            {"source": {"block": "k", "port": "constant-out"}, "target": {"block": "g", "port": "n"}}
          ]
        }
      },
      "dependencies": {
        "divider": {"design": {"graph": {
          "blocks": [{"id": "n", "type": "basic.constant", "data": {"value": "1"}}],
          "wires": []
        }}}
      }
    }"#,
    );
    let v = compile_target(Target::Verilog, &p, &CompileOptions::default(), &BoardRules::default())
        .unwrap();

    let top_end = v.find("endmodule").unwrap();
    let top = &v[..top_end];
    assert_eq!(top.matches("localparam p0 = vk;").count(), 1);
    assert!(top.contains(" vdivider #(\n  .vn(p0)\n ) vg ();"));
    assert!(!top.contains("wire"));
    assert!(top.contains(" parameter vk = 5"));
    assert!(v.contains("\nmodule vdivider #(\n parameter vn = 1\n);\n"));
}

#[test]
fn constant_drives_output_directly() {
    let p = project(
        r#"{"design": {"graph": {
          "blocks": [
            {"id": "k", "type": "basic.constant", "data": {"value": "1"}},
            {"id": "o", "type": "basic.output", "data": {"name": "led", "pins": [{"index": "0", "value": "95"}]}}
          ],
          "wires": [{"source": {"block": "k", "port": "constant-out"}, "target": {"block": "o", "port": "in"}}]
        }}}"#,
    );
    let v = compile_target(Target::Verilog, &p, &CompileOptions::default(), &BoardRules::default())
        .unwrap();
    assert!(v.contains(" localparam p0 = vk;\n assign vo = p0;\n"));
}

#[test]
fn local_constant_stays_inside_module() {
    let p = project(
        r#"{"design": {"graph": {
          "blocks": [
            {"id": "k", "type": "basic.constant", "data": {"name": "W", "value": "8", "local": true}}
          ],
          "wires": []
        }}}"#,
    );
    let out = compile_all(&p, &CompileOptions::default(), &BoardRules::default()).unwrap();
    assert_eq!(out.verilog, "\nmodule main;\n localparam vk = 8;\nendmodule\n");
    assert!(!out.testbench.contains("localparam W"));
}

#[test]
fn generated_ids_are_digested() {
    let json = INPUT_TO_OUTPUT
        .replace("\"a\"", "\"5f3c0d2e-8c1b-4b1e\"")
        .replace("\"b\"", "\"9a55-0f0e2b1c7d40\"");
    let p = project(&json);
    let v = compile_target(Target::Verilog, &p, &CompileOptions::default(), &BoardRules::default())
        .unwrap();
    let a = weft_common::digest_id("5f3c0d2e-8c1b-4b1e");
    let b = weft_common::digest_id("9a55-0f0e2b1c7d40");
    assert_eq!(a.len(), 7);
    assert!(v.contains(&format!(" input {a},\n output {b}\n")));
    assert!(v.contains(&format!(" assign w0 = {a};\n assign {b} = w0;\n")));
}

#[test]
fn compiling_twice_is_identical() {
    let p = project(INPUT_TO_OUTPUT);
    let first = compile_all(&p, &CompileOptions::with_board_rules(), &BoardRules::default()).unwrap();
    let second = compile_all(&p, &CompileOptions::with_board_rules(), &BoardRules::default()).unwrap();
    assert_eq!(first, second);
}
