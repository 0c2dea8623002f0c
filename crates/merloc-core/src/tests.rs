mod mermaid_output;
